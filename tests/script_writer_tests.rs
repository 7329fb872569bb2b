use finder_rs::error::FinderError;
use finder_rs::extensions::{Disperser, Lamp, ScriptWriter, ScriptWriterConfig};

fn writer() -> ScriptWriter {
    ScriptWriter::new(ScriptWriterConfig::default()).expect("default config is valid")
}

#[test]
fn bias_block_turns_lamps_off_first() {
    let mut script = writer();
    script.take_bias(5);

    assert_eq!(
        script.script(),
        "#taking 5 bias calibrations\n\
         kosmos set calstage=in neon=off krypton=off argon=off quartz=off\n\
         kosmosExpose bias n=5 name=\"2x2/cals/bias\" seq=nextByDir comment=\"\"\n"
    );
}

#[test]
fn lamp_block_scales_exposures_by_binning_and_slit_width() {
    let mut script = writer();
    script.take_lamps(Lamp::Argon, 3, "");

    let lines = script.lines();
    assert_eq!(lines[0], "#taking 3 argon calibrations");
    assert_eq!(
        lines[1],
        "kosmos set calstage=in neon=off krypton=off argon=on quartz=off"
    );
    assert_eq!(
        lines[2],
        "# lamp argon, slit=7.1-ctr (1/2), disperser=red (1/2),  3 iterations"
    );
    assert_eq!(lines[3], "kosmos set slit=1 disperser=6");
    assert_eq!(
        lines[4],
        "kosmosExpose flat time=0.14 n=3 name=\"2x2/cals/red-7.1-ctr-argon\" seq=nextByDir comment=\"\""
    );
    // blue argon through the narrow slit: 45 s / 4 * 2 / 1.18
    assert_eq!(
        lines[13],
        "kosmosExpose flat time=19.07 n=3 name=\"2x2/cals/blue-1.18-ctr-argon\" seq=nextByDir comment=\"\""
    );
    assert_eq!(lines[14], "#turning off lamps");
    assert_eq!(
        lines[15],
        "kosmos set calstage=in neon=off krypton=off argon=off quartz=off"
    );
    assert_eq!(lines[16], "");
    assert_eq!(lines.len(), 17);
}

#[test]
fn note_is_appended_to_file_names() {
    let config = ScriptWriterConfig {
        slits: [("1.0-ctr".to_owned(), 4)].into_iter().collect(),
        dispersers: [(Disperser::Blue, 3)].into_iter().collect(),
        binning: [1, 1],
    };
    let mut script = ScriptWriter::new(config).expect("valid");
    script.take_lamps(Lamp::Quartz, 10, "evening");

    assert!(script.script().contains(
        "kosmosExpose flat time=160.00 n=10 name=\"1x1/cals/blue-1.0-ctr-quartz-evening\""
    ));
}

#[test]
fn unparsable_slit_names_are_rejected() {
    let config = ScriptWriterConfig {
        slits: [("wide".to_owned(), 1)].into_iter().collect(),
        ..ScriptWriterConfig::default()
    };
    assert!(matches!(
        ScriptWriter::new(config),
        Err(FinderError::InvalidData(_))
    ));
}

#[test]
fn config_json_fills_missing_fields_with_defaults() {
    let config =
        ScriptWriterConfig::from_json_str(r#"{"dispersers": {"blue": 3}}"#).expect("parse");

    assert_eq!(config.dispersers.len(), 1);
    assert_eq!(config.dispersers.get(&Disperser::Blue), Some(&3));
    assert_eq!(config.slits, ScriptWriterConfig::default().slits);
    assert_eq!(config.binning_string(), "2x2");
}

#[test]
fn setup_summary_lists_dispersers_slits_and_binning() {
    assert_eq!(
        writer().setup_summary(),
        [
            "Assuming dispersers to calibrate are...",
            " position #6 = red",
            " position #3 = blue",
            "Assuming slits to calibrate are...",
            " position #1 = 7.1-ctr",
            " position #2 = 1.18-ctr",
            "Assuming binning is...",
            " 2x2",
        ]
    );
}
