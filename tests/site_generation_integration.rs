// Static site generation against a template on disk

use movie_catalog::site::{generate_website, SiteConfig, SiteError, GRID_PLACEHOLDER, TITLE_PLACEHOLDER};
use movie_catalog::StorageKind;

mod integration;
use integration::{TestFixture, SAMPLE_MOVIES, TEMPLATE};

fn site_config(fixture: &TestFixture) -> SiteConfig {
    SiteConfig {
        template_path: fixture.root_path.join("_static/index_template.html"),
        output_path: fixture.root_path.join("public/index.html"),
        page_title: "Weekend Picks".to_string(),
    }
}

#[test]
fn test_page_keeps_template_around_substitutions() {
    let fixture = TestFixture::new();
    fixture.write_template();
    let catalog = fixture.sample_store(StorageKind::Csv).list_movies().unwrap();

    let output = generate_website(&catalog, &site_config(&fixture)).expect("generation should succeed");
    let page = std::fs::read_to_string(&output).expect("page should exist");

    // Text outside the grid is byte-for-byte the template with the title filled in
    let (template_head, template_tail) = TEMPLATE.split_once(GRID_PLACEHOLDER).unwrap();
    let expected_head = template_head.replace(TITLE_PLACEHOLDER, "Weekend Picks");
    assert!(page.starts_with(&expected_head));
    assert!(page.ends_with(template_tail));

    assert!(!page.contains(TITLE_PLACEHOLDER));
    assert!(!page.contains(GRID_PLACEHOLDER));
    assert_eq!(page.matches("<li>").count(), SAMPLE_MOVIES.len());
    assert_eq!(page.matches("Weekend Picks").count(), 1);
}

#[test]
fn test_empty_catalog_renders_empty_grid() {
    let fixture = TestFixture::new();
    fixture.write_template();
    let catalog = fixture.store(StorageKind::Json).list_movies().unwrap();

    let output = generate_website(&catalog, &site_config(&fixture)).unwrap();
    let page = std::fs::read_to_string(output).unwrap();
    assert!(page.contains(r#"<ol class="movie-grid"></ol>"#));
}

#[test]
fn test_missing_template_is_reported() {
    let fixture = TestFixture::new();
    let catalog = fixture.sample_store(StorageKind::Json).list_movies().unwrap();

    let result = generate_website(&catalog, &site_config(&fixture));
    assert!(matches!(result, Err(SiteError::ReadTemplate { .. })));
    assert!(!fixture.root_path.join("public/index.html").exists());
}

#[test]
fn test_template_without_grid_placeholder() {
    let fixture = TestFixture::new();
    fixture.write_file("_static/index_template.html", "<h1>__TEMPLATE_TITLE__</h1>");
    let catalog = fixture.sample_store(StorageKind::Json).list_movies().unwrap();

    let result = generate_website(&catalog, &site_config(&fixture));
    assert!(matches!(result, Err(SiteError::MissingPlaceholder(GRID_PLACEHOLDER))));
}
