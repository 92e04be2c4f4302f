use faststyle::{ColorValue, StyleEngine, StyleValue, UnitValue};

fn px(value: f64) -> StyleValue {
  StyleValue::Unit(UnitValue::new(value, "px").unwrap())
}

#[test]
fn well_formed_definitions_compile_at_registration() {
  let mut engine = StyleEngine::new();
  for syntax in [
    "auto | <length> | <percentage>",
    "none | <image>",
    "[ <length> | <percentage> | auto ]{1,2} | cover | contain",
    "<length>{2,4} && <color>?",
    "left || right || center",
    "normal | [ first | last ]? baseline",
  ] {
    let name = format!("prop-{}", engine.property_count());
    engine
      .register_property(&name, syntax, "")
      .unwrap_or_else(|err| panic!("{:?} failed: {}", syntax, err));
  }
}

#[test]
fn unknown_data_type_fails_with_not_found() {
  let mut engine = StyleEngine::new();
  let err = engine.register_property("gap", "auto | <nonsense>", "auto").unwrap_err();
  assert!(matches!(
    err,
    faststyle::Error::Registry(faststyle::RegistryError::UnknownValueType { ref name }) if name == "nonsense"
  ));
  // The failed registration must not allocate a key.
  assert!(engine.property("gap").is_none());
}

#[test]
fn unknown_identifier_fails_with_not_found() {
  let mut engine = StyleEngine::new();
  let err = engine.register_property("gap", "frobnicate | auto", "auto").unwrap_err();
  assert!(matches!(
    err,
    faststyle::Error::Registry(faststyle::RegistryError::UnknownKeyword { ref name }) if name == "frobnicate"
  ));
}

#[test]
fn unparsable_initial_value_registers_as_invalid() {
  let mut engine = StyleEngine::new();
  let key = engine.register_property("tab-count", "<integer>", "lots").unwrap();
  let def = engine.property_by_key(key).unwrap();
  assert_eq!(def.initial, StyleValue::Invalid);
}

#[test]
fn builtin_width_syntax_accepts_all_alternatives() {
  let engine = StyleEngine::new();
  let auto = engine.keywords().key_of("auto").unwrap();
  assert_eq!(
    engine.parse_property_value("width", "auto").unwrap(),
    StyleValue::Keyword(auto)
  );
  assert_eq!(engine.parse_property_value("width", "100px").unwrap(), px(100.0));
  assert_eq!(
    engine.parse_property_value("width", "50%").unwrap(),
    StyleValue::Percentage(50.0)
  );
  assert!(engine.parse_property_value("width", "100vertical").is_err());
}

#[test]
fn box_shadow_accepts_lengths_and_color_in_any_order() {
  let engine = StyleEngine::new();
  let shadow = engine.parse_property_value("box-shadow", "2px 2px 8px #00ff00").unwrap();
  assert_eq!(
    shadow,
    StyleValue::Array(vec![
      px(2.0),
      px(2.0),
      px(8.0),
      StyleValue::Color(ColorValue::rgb(0, 255, 0)),
    ])
  );

  let leading_color = engine.parse_property_value("box-shadow", "#00ff00 2px 2px").unwrap();
  assert_eq!(
    leading_color,
    StyleValue::Array(vec![
      StyleValue::Color(ColorValue::rgb(0, 255, 0)),
      px(2.0),
      px(2.0),
    ])
  );

  // One length is below the {2,4} minimum.
  assert!(engine.parse_property_value("box-shadow", "2px #00ff00").is_err());
  // `none` takes the other alternative.
  let none_kw = engine.keywords().key_of("none").unwrap();
  assert_eq!(
    engine.parse_property_value("box-shadow", "none").unwrap(),
    StyleValue::Keyword(none_kw)
  );
}

#[test]
fn background_size_repeats_up_to_twice() {
  let engine = StyleEngine::new();
  let auto = engine.keywords().key_of("auto").unwrap();
  assert_eq!(
    engine.parse_property_value("background-size", "auto auto").unwrap(),
    StyleValue::Array(vec![StyleValue::Keyword(auto), StyleValue::Keyword(auto)])
  );
  assert_eq!(
    engine.parse_property_value("background-size", "100% 20px").unwrap(),
    StyleValue::Array(vec![StyleValue::Percentage(100.0), px(20.0)])
  );
  let cover = engine.keywords().key_of("cover").unwrap();
  assert_eq!(
    engine.parse_property_value("background-size", "cover").unwrap(),
    StyleValue::Keyword(cover)
  );
  assert!(engine.parse_property_value("background-size", "1px 2px 3px").is_err());
}

#[test]
fn background_position_takes_single_or_paired_components() {
  let engine = StyleEngine::new();
  let left = engine.keywords().key_of("left").unwrap();
  assert_eq!(
    engine.parse_property_value("background-position", "left").unwrap(),
    StyleValue::Keyword(left)
  );
  assert_eq!(
    engine.parse_property_value("background-position", "left 25%").unwrap(),
    StyleValue::Array(vec![StyleValue::Keyword(left), StyleValue::Percentage(25.0)])
  );
  assert_eq!(
    engine.parse_property_value("background-position", "0% 0%").unwrap(),
    StyleValue::Array(vec![StyleValue::Percentage(0.0), StyleValue::Percentage(0.0)])
  );
}

#[test]
fn justify_content_resolves_through_aliases() {
  let engine = StyleEngine::new();
  let space_between = engine.keywords().key_of("space-between").unwrap();
  assert_eq!(
    engine.parse_property_value("justify-content", "space-between").unwrap(),
    StyleValue::Keyword(space_between)
  );
  let baseline = engine.keywords().key_of("baseline").unwrap();
  let first = engine.keywords().key_of("first").unwrap();
  assert_eq!(
    engine.parse_property_value("justify-content", "first baseline").unwrap(),
    StyleValue::Array(vec![StyleValue::Keyword(first), StyleValue::Keyword(baseline)])
  );
}

#[test]
fn font_family_takes_the_raw_string() {
  let engine = StyleEngine::new();
  assert_eq!(
    engine.parse_property_value("font-family", "Noto Sans, sans-serif").unwrap(),
    StyleValue::String("Noto Sans, sans-serif".to_string())
  );
}

#[test]
fn alias_registration_is_guarded() {
  let mut engine = StyleEngine::new();
  // Shadowing a keyword is rejected.
  assert!(engine.register_value_type_alias("auto", "<length>").is_err());
  // Re-registering an alias is rejected.
  assert!(engine.register_value_type_alias("shadow", "<length>").is_err());
  // A fresh alias referencing existing machinery works and resolves.
  engine.register_value_type_alias("edge", "<length> | <percentage>").unwrap();
  assert!(engine.resolve_value_type("edge").is_some());
  let key = engine.register_property("scroll-margin", "none | edge", "none").unwrap();
  assert!(engine.property_by_key(key).is_some());
  assert_eq!(
    engine.parse_property_value("scroll-margin", "4px").unwrap(),
    px(4.0)
  );
}

#[test]
fn custom_value_types_participate_in_parsing() {
  fn parse_angle(s: &str) -> Option<StyleValue> {
    let degrees = s.strip_suffix("deg")?.parse::<f64>().ok()?;
    Some(StyleValue::Number(degrees))
  }

  let mut engine = StyleEngine::new();
  engine.register_value_type("angle", parse_angle).unwrap();
  engine.register_property("rotate", "none | <angle>", "none").unwrap();
  assert_eq!(
    engine.parse_property_value("rotate", "45deg").unwrap(),
    StyleValue::Number(45.0)
  );
  assert!(engine.parse_property_value("rotate", "45rad").is_err());
}
