// Catalogue and store loading guard rails.
#[path = "support/common.rs"]
mod common;

use anyhow::Result;
use serde_json::json;
use vim_prompt::{CategoryCatalogue, CommandStore, ConfigError, match_command};

use common::{TempDb, scenario_catalog};

#[test]
fn loads_catalogue_preserving_declaration_order() -> Result<()> {
    let db = TempDb::new()?;
    let path = db.write_catalog(&json!({
        "categories": {
            "zeta": {"name": "Zeta", "patterns": ["z"]},
            "alpha": {"name": "Alpha", "patterns": ["a"]}
        }
    }))?;
    let catalogue = CategoryCatalogue::load(&path)?;
    let ids: Vec<&str> = catalogue.ids_in_order().collect();
    assert_eq!(ids, vec!["zeta", "alpha"]);
    // Both hit; declaration order, not id order, breaks the tie.
    assert_eq!(match_command("za", "", &catalogue).most_common(), Some("zeta"));
    Ok(())
}

#[test]
fn schema_violations_are_reported_together() -> Result<()> {
    let db = TempDb::new()?;
    let path = db.write_catalog(&json!({
        "categories": {
            "motion": {"patterns": ["^h$"]},
            "edit": {"name": "Edit", "patterns": "delete"}
        }
    }))?;
    match CategoryCatalogue::load(&path) {
        Err(ConfigError::Schema { details, .. }) => {
            assert!(details.len() >= 2, "{details:?}");
            assert!(details.iter().any(|d| d.contains("name")), "{details:?}");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn missing_top_level_key_is_rejected() -> Result<()> {
    let db = TempDb::new()?;
    let path = db.write_store(&json!({"mappings": {}}))?;
    assert!(matches!(
        CommandStore::load(&path),
        Err(ConfigError::Schema { .. })
    ));
    Ok(())
}

#[test]
fn scenario_catalogue_exposes_flat_id_set() -> Result<()> {
    let db = TempDb::new()?;
    let path = db.write_catalog(&scenario_catalog())?;
    let catalogue = CategoryCatalogue::load(&path)?;
    let ids: Vec<&str> = catalogue
        .all_category_ids()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(ids, vec!["edit", "motion", "word_motion"]);
    assert!(catalogue.id_collisions().is_empty());
    Ok(())
}

#[test]
fn syntax_error_points_at_the_offending_line() -> Result<()> {
    let db = TempDb::new()?;
    let path = db.root().join("categories.json");
    std::fs::write(&path, "{\n  \"categories\": {\n    \"motion\": {\"name\": \"Motion\",}\n  }\n}\n")?;
    let err = CategoryCatalogue::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    let message = err.to_string();
    assert!(
        message.contains("\n      \"motion\": {\"name\": \"Motion\",}\n"),
        "{message}"
    );
    assert!(message.ends_with('^'), "{message}");
    Ok(())
}
