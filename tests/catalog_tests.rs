use approx::assert_relative_eq;
use finder_rs::core::SkyPosition;
use finder_rs::error::FinderError;
use finder_rs::extensions::{CatalogEntry, TuiCatalog};

fn tiny() -> TuiCatalog {
    let entries = ["C", "A", "B"]
        .into_iter()
        .zip([3.0, 1.0, 2.0])
        .zip([1.0, -1.0, 0.0])
        .map(|((name, hours), dec)| {
            CatalogEntry::new(name, SkyPosition::new(hours * 15.0, dec), "tiny")
        })
        .collect();
    TuiCatalog::from_entries("random-tiny-test", entries, true, true)
}

#[test]
fn written_catalog_reloads_with_the_same_targets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = tiny();

    let path = catalog.write_tui(dir.path(), true).expect("write tui");
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("random-tiny-test.tui")
    );
    let text = std::fs::read_to_string(&path).expect("read back");
    assert!(text.starts_with("CSys=ICRS; RotType=Horizon; RotAng=90\n\n\n"));
    assert_eq!(text.lines().count(), 6);

    let reloaded = TuiCatalog::read_tui("reloaded-tiny-test", &path).expect("reload");
    let names: Vec<&str> = reloaded.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
    for (original, copy) in catalog.entries().iter().zip(reloaded.entries()) {
        assert_relative_eq!(
            original.position.ra_deg.expect("ra"),
            copy.position.ra_deg.expect("ra"),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            original.position.dec_deg.expect("dec"),
            copy.position.dec_deg.expect("dec"),
            epsilon = 1e-6
        );
        assert_eq!(copy.category, "reloaded-tiny-test");
    }
}

#[test]
fn object_rotation_preamble_and_human_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = TuiCatalog::from_entries(
        "planets",
        vec![
            CatalogEntry::new("WASP 39", SkyPosition::new(217.3266, -3.4445), "transits")
                .with_distance_pc(213.98)
                .with_g_mag(11.8),
        ],
        true,
        true,
    );

    assert!(
        catalog
            .to_tui_string(false)
            .starts_with("CSys=ICRS; RotType=Object; RotAng=0\n\n\nWASP39 ")
    );

    let path = catalog.write_human_friendly(dir.path()).expect("write txt");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("txt"));
    let text = std::fs::read_to_string(path).expect("read back");
    assert!(text.starts_with("WASP39               14:29:18.4 -03:26:40.2   "));
    assert!(text.ends_with("transits, d=214.0pc, G=11.80\n"));
}

#[test]
fn merged_catalog_is_named_after_both_and_sorted() {
    let evening = TuiCatalog::from_entries(
        "evening",
        vec![CatalogEntry::new("late", SkyPosition::new(200.0, 0.0), "evening")],
        true,
        true,
    );
    let morning = TuiCatalog::from_entries(
        "morning",
        vec![CatalogEntry::new("early", SkyPosition::new(20.0, 0.0), "morning")],
        true,
        true,
    );

    let merged = &evening + &morning;

    assert_eq!(merged.name(), "evening+morning");
    let names: Vec<&str> = merged.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["early", "late"]);
    assert_eq!((evening + morning).len(), 2);
}

#[test]
fn malformed_lines_report_where_they_are() {
    let text = "# targets\nCSys=ICRS; RotType=Object; RotAng=0\n\nvega 18:36:56.3\n";

    let err = TuiCatalog::parse_tui("broken", text).expect_err("missing declination");

    assert!(matches!(err, FinderError::Parse { line: 4, .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = TuiCatalog::read_tui("none", dir.path().join("none.tui")).expect_err("no file");
    assert!(matches!(err, FinderError::Io(_)));
}
