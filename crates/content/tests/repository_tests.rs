use anyhow::Result;
use content::{Category, ContentConfig, ContentRepository, SourceStatus};
use std::path::Path;
use tempfile::tempdir;

fn write_source(root: &Path, dir: &str, name: &str, body: &str) -> Result<()> {
    let dir = root.join(dir);
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join(name), body)?;
    Ok(())
}

/// Metadata and body survive the trip from file to item
#[tokio::test]
async fn test_get_item_round_trip() -> Result<()> {
    let temp_dir = tempdir()?;
    write_source(
        temp_dir.path(),
        "blog",
        "hello.md",
        "---\ntitle: \"T\"\ndescription: \"D\"\ndate: \"2024-05-01\"\n---\n# Hi\n",
    )?;

    let repo = ContentRepository::new(ContentConfig::with_root(temp_dir.path()));
    let item = repo
        .get_item(Category::Article, "hello")
        .await
        .ok_or_else(|| anyhow::anyhow!("item should load"))?;

    assert_eq!(item.slug, "hello");
    assert_eq!(item.category, Category::Article);
    assert_eq!(item.title, "T");
    assert_eq!(item.description, "D");
    assert_eq!(item.published_at.raw(), Some("2024-05-01"));
    assert!(item.body_html.contains(r#"<h1 id="hi">Hi</h1>"#), "got: {}", item.body_html);
    assert!(item.target_keywords.is_empty());
    Ok(())
}

/// Editors that save UTF-8 with a byte order mark still yield metadata
#[tokio::test]
async fn test_get_item_with_bom() -> Result<()> {
    let temp_dir = tempdir()?;
    write_source(
        temp_dir.path(),
        "blog",
        "bom.md",
        "\u{feff}---\ntitle: T\ndate: 2024-05-01\n---\n# Hi",
    )?;

    let repo = ContentRepository::new(ContentConfig::with_root(temp_dir.path()));
    let item = repo
        .get_item(Category::Article, "bom")
        .await
        .ok_or_else(|| anyhow::anyhow!("item should load"))?;

    assert_eq!(item.title, "T");
    assert_eq!(item.published_at.raw(), Some("2024-05-01"));
    assert!(item.body_html.contains(r#"<h1 id="hi">Hi</h1>"#), "got: {}", item.body_html);
    assert!(!item.body_html.contains("title:"));
    Ok(())
}

/// Missing metadata fields fall back to defaults instead of failing the item
#[tokio::test]
async fn test_get_item_defaults() -> Result<()> {
    let temp_dir = tempdir()?;
    write_source(temp_dir.path(), "faq", "bare.md", "Just a body.\n")?;
    write_source(
        temp_dir.path(),
        "faq",
        "extra.md",
        "---\ntargetKeywords: [\"a\", \"b\"]\nideaName: cardio\nstatus: live\n---\nBody\n",
    )?;

    let repo = ContentRepository::new(ContentConfig::with_root(temp_dir.path()));

    let bare = repo
        .get_item(Category::Faq, "bare")
        .await
        .ok_or_else(|| anyhow::anyhow!("bare should load"))?;
    assert_eq!(bare.title, "");
    assert_eq!(bare.description, "");
    assert_eq!(bare.published_at.raw(), None);
    assert!(bare.body_html.contains("<p>Just a body.</p>"));

    let extra = repo
        .get_item(Category::Faq, "extra")
        .await
        .ok_or_else(|| anyhow::anyhow!("extra should load"))?;
    assert_eq!(extra.target_keywords, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(extra.idea_name.as_deref(), Some("cardio"));
    assert_eq!(extra.status.as_deref(), Some("live"));
    Ok(())
}

/// Unknown, malformed and path-escaping slugs are all just absent
#[tokio::test]
async fn test_get_item_absent() -> Result<()> {
    let temp_dir = tempdir()?;
    write_source(temp_dir.path(), "blog", "broken.md", "---\ntitle: [oops\n---\nBody\n")?;
    write_source(temp_dir.path(), "", "secret.md", "---\ntitle: S\n---\n")?;

    let repo = ContentRepository::new(ContentConfig::with_root(temp_dir.path()));

    assert!(repo.get_item(Category::Article, "nope").await.is_none());
    assert!(repo.get_item(Category::Article, "broken").await.is_none());
    assert!(repo.get_item(Category::Article, "../secret").await.is_none());
    assert!(repo.get_item(Category::Comparison, "anything").await.is_none());
    Ok(())
}

/// Listings are newest first, with undated items at the end
#[tokio::test]
async fn test_list_items_sorted_newest_first() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    write_source(root, "comparison", "a-older.md", "---\ntitle: Older\ndate: 2024-01-01\n---\nA\n")?;
    write_source(root, "comparison", "b-newer.md", "---\ntitle: Newer\ndate: 2024-01-02\n---\nB\n")?;
    write_source(root, "comparison", "c-undated.md", "---\ntitle: Undated\n---\nC\n")?;
    write_source(root, "comparison", "d-broken.md", "---\ntitle: [\n---\nD\n")?;
    write_source(root, "comparison", "notes.txt", "not content")?;

    let repo = ContentRepository::new(ContentConfig::with_root(root));

    let slugs = repo.list_slugs(Category::Comparison).await;
    assert_eq!(
        slugs.to_vec(),
        vec!["a-older", "b-newer", "c-undated", "d-broken"]
    );

    let items = repo.list_items(Category::Comparison).await;
    assert_eq!(items.source(), &SourceStatus::Available);
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Newer", "Older", "Undated"]);
    Ok(())
}

/// Items sharing a date keep discovery order
#[tokio::test]
async fn test_list_items_ties_are_stable() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    for slug in ["x", "y", "z"] {
        write_source(root, "blog", &format!("{}.md", slug), "---\ndate: 2024-03-03\n---\n")?;
    }

    let repo = ContentRepository::new(ContentConfig::with_root(root));
    let slugs: Vec<String> = repo
        .list_items(Category::Article)
        .await
        .into_iter()
        .map(|i| i.slug)
        .collect();
    assert_eq!(slugs, vec!["x", "y", "z"]);
    Ok(())
}

/// A missing category directory lists as empty rather than failing
#[tokio::test]
async fn test_missing_directory_is_empty() -> Result<()> {
    let temp_dir = tempdir()?;
    let repo = ContentRepository::new(ContentConfig::with_root(temp_dir.path().join("nowhere")));

    let slugs = repo.list_slugs(Category::Faq).await;
    assert!(slugs.is_empty());
    assert_eq!(slugs.source(), &SourceStatus::Missing);

    let items = repo.list_items(Category::Faq).await;
    assert!(items.is_empty());
    assert_eq!(items.source(), &SourceStatus::Missing);
    Ok(())
}

/// Directory overrides from config are honoured
#[tokio::test]
async fn test_directory_override() -> Result<()> {
    let temp_dir = tempdir()?;
    write_source(temp_dir.path(), "posts", "moved.md", "---\ntitle: Moved\n---\n")?;

    let mut config = ContentConfig::with_root(temp_dir.path());
    config.directories.insert(Category::Article, "posts".to_string());
    let repo = ContentRepository::new(config);

    let item = repo.get_item(Category::Article, "moved").await;
    assert_eq!(item.map(|i| i.title), Some("Moved".to_string()));
    Ok(())
}
