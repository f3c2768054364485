use super::*;

#[test]
fn defaults_cover_every_section() {
    let cfg = OverprintConfig::default();
    assert_eq!(cfg.preview, Canvas::PREVIEW);
    assert_eq!(cfg.export, Canvas::EXPORT);
    assert_eq!(cfg.server.overlay_max_px, 200);
    assert_eq!(cfg.server.text_offset_y, 30.0);
    assert_eq!(cfg.defaults.font_size, 40.0);
    assert_eq!(cfg.defaults.background_color, Color::BLACK);
    assert_eq!(cfg.defaults.font_color, Color::WHITE);
    assert_eq!(cfg.logging.level, "info");
    cfg.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = OverprintConfig::from_json(
        r##"{ "server": { "bind": "0.0.0.0:8080" }, "defaults": { "fontColor": "#ff0000" } }"##,
    )
    .unwrap();
    assert_eq!(cfg.server.bind, "0.0.0.0:8080");
    assert_eq!(cfg.server.max_body_bytes, ServerConfig::default().max_body_bytes);
    assert_eq!(cfg.defaults.font_color, Color::rgb(255, 0, 0));
    assert_eq!(cfg.defaults.font_family, "Arial");
}

#[test]
fn unknown_font_families_are_rejected() {
    let err = OverprintConfig::from_json(r#"{ "fonts": { "Comic Sans": "x.ttf" } }"#).unwrap_err();
    assert!(matches!(err, OverprintError::Config(_)));
    assert!(OverprintConfig::from_json(r#"{ "server": { "overlayMaxPx": 0 } }"#).is_err());
    assert!(OverprintConfig::from_json("not json").is_err());
}

#[test]
fn from_path_resolves_relative_paths() {
    let dir = std::env::temp_dir().join(format!("overprint-cfg-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("overprint.json");
    std::fs::write(
        &path,
        r#"{ "fonts": { "Verdana": "fonts/v.ttf" }, "assetsRoot": "assets" }"#,
    )
    .unwrap();

    let cfg = OverprintConfig::from_path(&path).unwrap();
    assert_eq!(cfg.fonts["Verdana"], dir.join("fonts/v.ttf"));
    assert_eq!(cfg.assets_root, dir.join("assets"));
}

#[test]
fn load_or_default_swallows_errors() {
    let cfg = OverprintConfig::load_or_default(Some(Path::new("/definitely/missing.json")));
    assert_eq!(cfg.server.bind, ServerConfig::default().bind);
    assert_eq!(OverprintConfig::load_or_default(None).export, Canvas::EXPORT);
}

#[test]
fn pretty_json_round_trips() {
    let json = OverprintConfig::default().to_json_pretty().unwrap();
    let back = OverprintConfig::from_json(&json).unwrap();
    assert_eq!(back.export, Canvas::EXPORT);
}
