//! Front-matter Integration Tests
//!
//! Documents produced by the writer must satisfy the schema the site build
//! enforces, whatever the model put in the title and description.

use chrono::{TimeZone, Utc};
use motori::core::{CollisionStrategy, CoverRef, DocumentWriter, Slug, WriterSettings};
use motori::domain::{check_tree, parse_document, Category, GeneratedArticle};
use tempfile::TempDir;

fn article(title: &str, description: &str) -> GeneratedArticle {
    GeneratedArticle {
        title: title.to_string(),
        description: description.to_string(),
        body: "<p>corpo</p>".to_string(),
    }
}

#[test]
fn test_hostile_strings_round_trip() {
    let writer = DocumentWriter::new(WriterSettings::default());
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap();

    let cases = [
        ("Il \"nuovo\" SUV", "Descrizione con \"virgolette\""),
        ("Percorso C:\\strada\\nuova", "Backslash \\ finale \\"),
        ("Titolo\r\nsu due righe", "riga uno\nriga due"),
        ("title: finto: due punti", "# non un commento"),
        ("---", "--- anche qui"),
        ("Prezzo: 29.900 €", "Sconto del 10% & più"),
        ("Fiat\u{7} 500", "Esc\u{1b}[1m grassetto"),
        ("Nul\0x", "Del\u{7f} e C1\u{9b}"),
        ("Nel\u{85}x", "a\u{2028}b\u{2029}c"),
        ("\u{feff}Titolo con BOM", "tab\tdentro"),
    ];

    for (title, description) in cases {
        let text = writer.render(&article(title, description), Category::News, &CoverRef::Placeholder, now);
        let doc = parse_document(&text, Category::News)
            .unwrap_or_else(|e| panic!("{:?} did not parse: {}", title, e));

        assert_eq!(doc.front_matter.title, title.replace('\r', ""));
        assert_eq!(doc.front_matter.description, description);
        assert_eq!(doc.front_matter.pub_date, "2025-06-15");
        assert_eq!(doc.front_matter.author, "Redazione");
        assert_eq!(doc.front_matter.categories, vec!["News".to_string()]);
        assert_eq!(
            doc.front_matter.tags,
            vec!["auto".to_string(), "novità".to_string()]
        );
        assert_eq!(
            doc.front_matter.cover.as_deref(),
            Some("${import.meta.env.BASE_URL}images/placeholder.jpg")
        );
        assert_eq!(doc.body, "<p>corpo</p>\n");
    }
}

#[tokio::test]
async fn test_check_tree_flags_invalid_documents() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    let writer = DocumentWriter::new(WriterSettings {
        content_root: root.clone(),
        image_root: temp.path().join("images"),
        collision: CollisionStrategy::Overwrite,
        ..Default::default()
    });
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap();

    for (category, title) in [(Category::News, "Buona"), (Category::Guides, "Guida")] {
        let slug = Slug::from_title(title);
        let paths = writer.plan(category, &slug, now);
        let text = writer.render(&article(title, "D"), category, &CoverRef::Placeholder, now);
        writer.write(&paths, &text).await.unwrap();
    }

    // Hand-edited road test with an impossible score
    std::fs::create_dir_all(root.join("tests")).unwrap();
    std::fs::write(
        root.join("tests/rotta.md"),
        "---\ntitle: \"R\"\ndescription: \"D\"\npubDate: \"2025-01-01\"\nscore: 12\n---\n\n<p>x</p>\n",
    )
    .unwrap();

    // Not a collection: ignored
    std::fs::create_dir_all(root.join("drafts")).unwrap();
    std::fs::write(root.join("drafts/bozza.md"), "nessun front-matter").unwrap();

    let checks = check_tree(&root).unwrap();
    assert_eq!(checks.len(), 3);

    let invalid: Vec<_> = checks.iter().filter(|c| !c.is_valid()).collect();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].category, Category::Tests);
    assert!(invalid[0].path.ends_with("tests/rotta.md"));
}
