use std::io::Cursor;

use chrono::{TimeZone, Utc};

use crate::workflows::outfits::domain::{
    Category, Formality, Material, Pattern, Seasonality, StyleBucket,
};
use crate::workflows::wardrobe::import::parse_timestamp_for_tests;
use crate::workflows::wardrobe::{WardrobeImportError, WardrobeImporter};

const HEADER: &str = "id,name,category,primary_color,secondary_color,material,fit,pattern,seasonality,formality,style,wear_count,last_worn,tags,description";

fn csv(rows: &[&str]) -> Cursor<String> {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    Cursor::new(text)
}

#[test]
fn full_rows_map_onto_garments() {
    let garments = WardrobeImporter::from_reader(csv(&[
        "sweater-1,Cable knit,top,Cream,,wool,relaxed,solid,winter,smart casual,classic,4,2025-10-01,cozy; Layering,Chunky cable knit",
        "sandals,Slides,shoes,tan,,leather,,,summer,casual,casual,0,,open-toe,",
    ]))
    .expect("valid export");

    assert_eq!(garments.len(), 2);
    let sweater = &garments[0];
    assert_eq!(sweater.id.as_str(), "sweater-1");
    assert_eq!(sweater.category, Category::Top);
    assert_eq!(sweater.primary_color, "cream");
    assert_eq!(sweater.secondary_color, None);
    assert_eq!(sweater.material, Material::Wool);
    assert_eq!(sweater.fit.as_deref(), Some("relaxed"));
    assert_eq!(sweater.seasonality, Seasonality::Winter);
    assert_eq!(sweater.formality, Formality::SmartCasual);
    assert_eq!(sweater.style, StyleBucket::Classic);
    assert_eq!(sweater.wear_count, 4);
    assert_eq!(
        sweater.last_worn,
        Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).single()
    );
    assert!(sweater.has_tag("cozy") && sweater.has_tag("layering"));
    assert_eq!(sweater.description.as_deref(), Some("Chunky cable knit"));

    let sandals = &garments[1];
    assert_eq!(sandals.pattern, Pattern::Solid);
    assert_eq!(sandals.last_worn, None);
    assert!(sandals.has_tag("open-toe"));
}

#[test]
fn unknown_category_names_the_line() {
    let err = WardrobeImporter::from_reader(csv(&[
        "t1,Tee,top,white,,,,,,,,,,,",
        "x1,Cape,cloak,black,,,,,,,,,,,",
    ]))
    .expect_err("cloak is not a category");

    match err {
        WardrobeImportError::InvalidField { line, field, value } => {
            assert_eq!(line, 3);
            assert_eq!(field, "category");
            assert_eq!(value, "cloak");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_material_is_rejected_but_other_is_accepted() {
    let err = WardrobeImporter::from_reader(csv(&["t1,Tee,top,white,,unobtainium,,,,,,,,,"]))
        .expect_err("unknown material");
    assert!(err.to_string().contains("material 'unobtainium'"));

    let garments = WardrobeImporter::from_reader(csv(&["t1,Tee,top,white,,Other,,,,,,,,,"]))
        .expect("explicit other");
    assert_eq!(garments[0].material, Material::Other);
}

#[test]
fn bad_wear_count_and_date_are_field_errors() {
    let err = WardrobeImporter::from_reader(csv(&["t1,Tee,top,white,,,,,,,,many,,,"]))
        .expect_err("wear count must be numeric");
    assert!(matches!(
        err,
        WardrobeImportError::InvalidField {
            field: "wear_count",
            ..
        }
    ));

    let err = WardrobeImporter::from_reader(csv(&["t1,Tee,top,white,,,,,,,,,last week,,"]))
        .expect_err("unparseable date");
    assert!(matches!(
        err,
        WardrobeImportError::InvalidField {
            field: "last_worn",
            ..
        }
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = WardrobeImporter::from_reader(csv(&[
        "t1,Tee,top,white,,,,,,,,,,,",
        "t1,Other tee,top,black,,,,,,,,,,,",
    ]))
    .expect_err("duplicate id");

    assert!(matches!(err, WardrobeImportError::DuplicateId { line: 3, .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = WardrobeImporter::from_path("/definitely/not/a/wardrobe.csv")
        .expect_err("missing file");
    assert!(matches!(err, WardrobeImportError::Io(_)));
}

#[test]
fn timestamps_accept_rfc3339_and_plain_dates() {
    assert_eq!(
        parse_timestamp_for_tests("2025-10-05T18:30:00-04:00"),
        Utc.with_ymd_and_hms(2025, 10, 5, 22, 30, 0).single()
    );
    assert_eq!(
        parse_timestamp_for_tests("2025-10-05"),
        Utc.with_ymd_and_hms(2025, 10, 5, 0, 0, 0).single()
    );
    assert_eq!(parse_timestamp_for_tests("yesterday"), None);
}
