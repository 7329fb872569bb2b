use finder_rs::api::FinderChartConfig;
use finder_rs::core::{Band, OffsetUnit};
use finder_rs::error::FinderError;
use finder_rs::interaction::HighlightStyle;
use finder_rs::render::Color;

#[test]
fn defaults_match_a_gaia_arcminute_chart() {
    let config = FinderChartConfig::default();

    assert_eq!(config.band, Band::GGaia);
    assert_eq!(config.unit, OffsetUnit::Arcmin);
    assert_eq!(config.faintest_magnitude_to_show, 20.0);
    assert_eq!(config.faintest_magnitude_to_label, 16.0);
    assert_eq!(config.size_of_zero_magnitude, 100.0);
    assert_eq!(config.pick_radius, 0.1);
    assert_eq!(config.highlight.color, Color::DARK_ORCHID.with_alpha(0.5));
    assert_eq!(config.highlight.marker_size, 100.0);
    assert_eq!(config.highlight.label_font_size_pt, 7.0);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_json_keeps_defaults_for_missing_fields() {
    let config = FinderChartConfig::from_json_str(r#"{"band": "r_sloan", "unit": "arcsec"}"#)
        .expect("parse");

    assert_eq!(config.band, Band::RSloan);
    assert_eq!(config.unit, OffsetUnit::Arcsec);
    assert_eq!(config.highlight, HighlightStyle::default());
    assert_eq!(config.pick_radius, 0.1);
}

#[test]
fn json_contract_preserves_builder_settings() {
    let config = FinderChartConfig::default()
        .with_band(Band::BpGaia)
        .with_unit(OffsetUnit::Degree)
        .with_magnitude_limits(18.0, 14.0)
        .with_pick_radius(0.002);

    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"band\": \"BP_gaia\""));
    assert_eq!(FinderChartConfig::from_json_str(&json).expect("parse"), config);
}

#[test]
fn invalid_values_are_rejected() {
    let err = FinderChartConfig::from_json_str(r#"{"pick_radius": -1.0}"#).expect_err("negative");
    assert!(matches!(err, FinderError::InvalidData(message) if message.contains("pick_radius")));

    let err = FinderChartConfig::from_json_str("{not json").expect_err("syntax");
    assert!(matches!(err, FinderError::InvalidData(_)));

    let highlight = HighlightStyle {
        marker_size: 0.0,
        ..HighlightStyle::default()
    };
    assert!(
        FinderChartConfig::default()
            .with_highlight(highlight)
            .validate()
            .is_err()
    );
}
