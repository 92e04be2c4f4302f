use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use faststyle::Selector;
use faststyle::StyleDeclaration;
use faststyle::StyleEngine;

const TYPES: &[&str] = &["div", "p", "button", "label", "textview", "panel"];
const CLASSES: &[&str] = &["red", "big", "side", "row", "card", "dim"];

fn build_engine(rule_count: usize) -> StyleEngine {
  let mut engine = StyleEngine::new();
  let width_key = engine.property("width").unwrap().key;
  let color_key = engine.property("color").unwrap().key;
  for i in 0..rule_count {
    let type_name = TYPES[i % TYPES.len()];
    let class = CLASSES[(i / TYPES.len()) % CLASSES.len()];
    let text = match i % 3 {
      0 => type_name.to_string(),
      1 => format!("{}.{}", type_name, class),
      _ => format!("panel.{} {}", class, type_name),
    };
    let selector = Selector::parse(&text).unwrap();
    let mut decl = StyleDeclaration::with_len(engine.property_count());
    decl.set(width_key, engine.parse_property_value("width", "50px").unwrap());
    decl.set(color_key, engine.parse_property_value("color", "#123456").unwrap());
    engine.add_style_sheet(&selector, &decl, Some("bench.css")).unwrap();
  }
  engine
}

fn selector_parse_benchmark(c: &mut Criterion) {
  c.bench_function("selector_parse_compound", |b| {
    b.iter(|| Selector::parse(black_box("panel.side.card list#main textview.red.big:hover")).unwrap())
  });
}

fn query_benchmark(c: &mut Criterion) {
  let engine = build_engine(300);
  let selector = Selector::parse("panel.side div.red.big:hover").unwrap();
  c.bench_function("query_selector_300_rules", |b| {
    b.iter(|| black_box(engine.query_selector(black_box(&selector))).len())
  });
}

fn computed_style_benchmark(c: &mut Criterion) {
  let mut engine = build_engine(300);
  let selector = Selector::parse("panel.side div.red.big:hover").unwrap();

  c.bench_function("computed_style_cached", |b| {
    b.iter(|| black_box(engine.computed_style(black_box(&selector))))
  });

  let cold_decl = StyleDeclaration::with_len(engine.property_count());
  c.bench_function("computed_style_after_flush", |b| {
    b.iter(|| {
      // Each insertion flushes the cache, forcing a full recompute.
      let bump = Selector::parse("footer").unwrap();
      engine.add_style_sheet(&bump, &cold_decl, None).unwrap();
      black_box(engine.computed_style(black_box(&selector)))
    })
  });
}

criterion_group!(
  benches,
  selector_parse_benchmark,
  query_benchmark,
  computed_style_benchmark
);
criterion_main!(benches);
