use chrono::Utc;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use orderbot::conversation::{advance, match_menu_item};
use orderbot::{ContextData, MemoryStore, MenuItem, OrderBot, Pipeline, PipelineControl, ProductVariant, RecordingMessenger, Session, SessionStep};
use std::sync::Arc;
use tokio::runtime::Runtime;

fn menu(size: usize) -> Vec<MenuItem> {
  (0..size)
    .map(|i| MenuItem {
      variant_id: format!("Product {} - Regular", i),
      product_name: format!("Product {}", i),
      name: format!("Product {} - Regular", i),
      unit_price_cents: 10_000 + i as i64,
      currency: "KES".to_string(),
    })
    .collect()
}

fn catalog() -> Vec<ProductVariant> {
  menu(10)
    .into_iter()
    .map(|item| ProductVariant {
      id: item.variant_id,
      product_name: item.product_name,
      variant_name: item.name,
      variant_type: Some("Size".to_string()),
      unit_price_cents: item.unit_price_cents,
      currency: item.currency,
      stock_quantity: i32::MAX,
      is_available: true,
      description: None,
    })
    .collect()
}

// --- Pure state machine ---

fn bench_advance(c: &mut Criterion) {
  let mut group = c.benchmark_group("StateMachineAdvance");
  let items = menu(10);
  let mut session = Session::new("254700000000", Utc::now());

  session.step = SessionStep::AwaitingItem;
  group.bench_function("select_by_number", |b| b.iter(|| advance(&session, "7", &items, Utc::now())));
  group.bench_function("select_by_name", |b| {
    b.iter(|| advance(&session, "product 9 - regular", &items, Utc::now()))
  });

  session.step = SessionStep::AwaitingCommand;
  group.bench_function("render_menu", |b| b.iter(|| advance(&session, "order", &items, Utc::now())));
  group.finish();
}

fn bench_item_matching(c: &mut Criterion) {
  let mut group = c.benchmark_group("ItemMatching");
  for size in [1usize, 10, 100].iter() {
    let items = menu(*size);
    let worst_case = format!("product {} - regular", size - 1);
    group.throughput(Throughput::Elements(*size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &worst_case, |b, input| {
      b.iter(|| match_menu_item(input, &items))
    });
  }
  group.finish();
}

// --- Pipeline overhead ---

fn bench_pipeline_steps(c: &mut Criterion) {
  let mut group = c.benchmark_group("PipelineSteps");
  let rt = Runtime::new().unwrap();

  for num_steps in [1usize, 4, 16].iter() {
    let names: Vec<String> = (0..*num_steps).map(|i| format!("step_{}", i)).collect();
    let defs: Vec<(&str, bool, Option<orderbot::pipeline::SkipCondition<u64>>)> =
      names.iter().map(|n| (n.as_str(), false, None)).collect();
    let mut pipeline = Pipeline::<u64>::new("bench", &defs);
    for name in &names {
      pipeline.on_root(name, |ctx: ContextData<u64>| async move {
        *ctx.write() += 1;
        Ok::<_, orderbot::BotError>(PipelineControl::Continue)
      });
    }

    group.bench_with_input(BenchmarkId::from_parameter(num_steps), num_steps, |b, _| {
      b.to_async(&rt).iter(|| async {
        pipeline.run(ContextData::new(0u64)).await.unwrap();
      })
    });
  }
  group.finish();
}

// --- Full inbound handling over the in-memory store ---

fn bench_full_conversation(c: &mut Criterion) {
  let rt = Runtime::new().unwrap();
  let bot = OrderBot::new(
    Arc::new(MemoryStore::with_variants(catalog())),
    Arc::new(RecordingMessenger::new()),
    "KES",
  );
  let script = ["order", "3", "2", "123 Main Street, Nairobi", "yes"];

  c.bench_function("FullConversation", |b| {
    b.to_async(&rt).iter(|| async {
      for text in script {
        bot.conversations.handle_message("254700000000", text).await.unwrap();
      }
    })
  });
}

criterion_group!(
  benches,
  bench_advance,
  bench_item_matching,
  bench_pipeline_steps,
  bench_full_conversation
);
criterion_main!(benches);
