//! Author and book CRUD, search and the orphan-cascade rule.

mod support;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use support::spawn_app;

#[tokio::test]
async fn author_crud_roundtrip() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;

    let (status, created) = app
        .request(
            Method::POST,
            "/authors",
            Some(&admin),
            Some(json!({ "name": "Ursula K. Le Guin", "biography": "Essayist and novelist" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Ursula K. Le Guin");
    assert_eq!(created["books"], json!([]));

    let (status, fetched) = app
        .request(Method::GET, &format!("/authors/{id}"), None, None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["biography"], "Essayist and novelist");

    // PUT is a full replace: omitting the biography clears it.
    let (status, updated) = app
        .request(
            Method::PUT,
            &format!("/authors/{id}"),
            Some(&admin),
            Some(json!({ "name": "U. K. Le Guin", "biography": null })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "U. K. Le Guin");
    assert_eq!(updated["biography"], Value::Null);

    let (status, _) = app
        .request(Method::GET, "/authors/424242", None, None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            Method::PUT,
            "/authors/424242",
            Some(&admin),
            Some(json!({ "name": "X", "biography": null })),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::DELETE, "/authors/424242", Some(&admin), None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn author_listing_supports_skip_and_limit() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    for name in ["First", "Second", "Third"] {
        app.create_author(&admin, name).await?;
    }

    let (status, body) = app
        .request(Method::GET, "/authors?skip=1&limit=1", None, None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["name"], "Second");

    let (_, body) = app.request(Method::GET, "/authors", None, None).await?;
    assert_eq!(body.as_array().unwrap().len(), 3);

    Ok(())
}

#[tokio::test]
async fn author_search_is_case_insensitive_substring() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    app.create_author(&admin, "Stanislaw Lem").await?;
    app.create_author(&admin, "Ted Chiang").await?;

    let (status, body) = app
        .request(Method::GET, "/authors/search/LEM", None, None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Stanislaw Lem");

    let (_, body) = app
        .request(Method::GET, "/authors/search/nobody", None, None)
        .await?;
    assert_eq!(body.as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn non_admin_mutations_are_forbidden_without_side_effects() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let author_id = app.create_author(&admin, "Keeper").await?;
    let book_id = app
        .create_book(&admin, "Kept", "isbn-kept", 2001, &[author_id])
        .await?;

    let token = app.token_for("pleb", "pleb@example.com", "pw").await?;

    let attempts = [
        (Method::POST, "/authors".to_string(), Some(json!({ "name": "X", "biography": null }))),
        (
            Method::PUT,
            format!("/authors/{author_id}"),
            Some(json!({ "name": "X", "biography": null })),
        ),
        (Method::DELETE, format!("/authors/{author_id}"), None),
        (
            Method::POST,
            "/books".to_string(),
            Some(json!({
                "title": "X", "isbn": "x", "publication_year": 1999,
                "description": null, "author_ids": [author_id]
            })),
        ),
        (
            Method::PUT,
            format!("/books/{book_id}"),
            Some(json!({
                "title": "X", "isbn": "x", "publication_year": 1999,
                "description": null, "author_ids": [author_id]
            })),
        ),
        (Method::DELETE, format!("/books/{book_id}"), None),
    ];
    for (method, uri, body) in attempts {
        let (status, _) = app.request(method, &uri, Some(&token), body).await?;
        assert_eq!(status, StatusCode::FORBIDDEN, "at {uri}");
    }

    // Nothing changed.
    let (_, authors) = app.request(Method::GET, "/authors", None, None).await?;
    assert_eq!(authors.as_array().unwrap().len(), 1);
    assert_eq!(authors[0]["name"], "Keeper");
    let (_, book) = app
        .request(Method::GET, &format!("/books/{book_id}"), None, None)
        .await?;
    assert_eq!(book["title"], "Kept");

    Ok(())
}

#[tokio::test]
async fn create_book_resolves_all_authors_or_none() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let author_id = app.create_author(&admin, "Real").await?;

    let (status, body) = app
        .request(
            Method::POST,
            "/books",
            Some(&admin),
            Some(json!({
                "title": "Ghostwritten", "isbn": "isbn-ghost", "publication_year": 1999,
                "description": null, "author_ids": [author_id, 9999]
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "One or more authors not found");

    // No partial book row was created.
    let (_, books) = app.request(Method::GET, "/books", None, None).await?;
    assert_eq!(books.as_array().unwrap().len(), 0);

    let (status, body) = app
        .request(
            Method::POST,
            "/books",
            Some(&admin),
            Some(json!({
                "title": "Ghostwritten", "isbn": "isbn-ghost", "publication_year": 1999,
                "description": "A novel", "author_ids": [author_id]
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 0.0);
    assert_eq!(body["authors"][0]["name"], "Real");

    Ok(())
}

#[tokio::test]
async fn duplicate_isbn_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let author_id = app.create_author(&admin, "Solo").await?;
    app.create_book(&admin, "One", "same-isbn", 2000, &[author_id])
        .await?;

    let (status, body) = app
        .request(
            Method::POST,
            "/books",
            Some(&admin),
            Some(json!({
                "title": "Two", "isbn": "same-isbn", "publication_year": 2001,
                "description": null, "author_ids": [author_id]
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "ISBN already registered");

    Ok(())
}

#[tokio::test]
async fn update_book_replaces_fields_and_author_set() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let first = app.create_author(&admin, "First").await?;
    let second = app.create_author(&admin, "Second").await?;
    let book_id = app
        .create_book(&admin, "Original", "isbn-upd", 2010, &[first])
        .await?;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/books/{book_id}"),
            Some(&admin),
            Some(json!({
                "title": "Revised", "isbn": "isbn-upd", "publication_year": 2011,
                "description": "second edition", "author_ids": [second]
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Revised");
    assert_eq!(body["publication_year"], 2011);
    let authors = body["authors"].as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["name"], "Second");

    // Unknown author in the replacement set fails and changes nothing.
    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/books/{book_id}"),
            Some(&admin),
            Some(json!({
                "title": "Broken", "isbn": "isbn-upd", "publication_year": 2011,
                "description": null, "author_ids": [9999]
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = app
        .request(Method::GET, &format!("/books/{book_id}"), None, None)
        .await?;
    assert_eq!(body["title"], "Revised");

    // Unknown book id is NotFound.
    let (status, _) = app
        .request(
            Method::PUT,
            "/books/31337",
            Some(&admin),
            Some(json!({
                "title": "X", "isbn": "isbn-new", "publication_year": 2011,
                "description": null, "author_ids": [second]
            })),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn deleting_an_author_cascades_to_orphaned_books() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let sole = app.create_author(&admin, "Sole Author").await?;
    let co = app.create_author(&admin, "Co Author").await?;
    let orphaned = app
        .create_book(&admin, "Orphaned Tome", "isbn-orphan", 1990, &[sole])
        .await?;
    let survivor = app
        .create_book(&admin, "Joint Work", "isbn-joint", 1991, &[sole, co])
        .await?;

    let (status, body) = app
        .request(Method::DELETE, &format!("/authors/{sole}"), Some(&admin), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_books"], json!(["Orphaned Tome"]));

    // The orphaned book is gone, the co-authored one survives.
    let (status, _) = app
        .request(Method::GET, &format!("/books/{orphaned}"), None, None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .request(Method::GET, &format!("/books/{survivor}"), None, None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    let authors = body["authors"].as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["name"], "Co Author");

    let (status, _) = app
        .request(Method::GET, &format!("/authors/{sole}"), None, None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn delete_book_removes_links_and_ratings() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let author_id = app.create_author(&admin, "Lonely").await?;
    let book_id = app
        .create_book(&admin, "Short Lived", "isbn-short", 2020, &[author_id])
        .await?;
    app.request(
        Method::POST,
        &format!("/books/{book_id}/rate"),
        Some(&admin),
        Some(json!({ "rating": 4 })),
    )
    .await?;

    let (status, _) = app
        .request(Method::DELETE, &format!("/books/{book_id}"), Some(&admin), None)
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::GET, &format!("/books/{book_id}"), None, None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The author no longer lists the book.
    let (_, author) = app
        .request(Method::GET, &format!("/authors/{author_id}"), None, None)
        .await?;
    assert_eq!(author["books"], json!([]));

    // Deleting again is NotFound.
    let (status, _) = app
        .request(Method::DELETE, &format!("/books/{book_id}"), Some(&admin), None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn book_search_matches_title_isbn_and_year() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let author_id = app.create_author(&admin, "Frank Herbert").await?;
    app.create_book(&admin, "Dune", "9780441172719", 1965, &[author_id])
        .await?;
    app.create_book(&admin, "Hyperion", "9780553283686", 1989, &[author_id])
        .await?;

    for needle in ["dune", "DUNE", "0441", "1965"] {
        let (status, body) = app
            .request(Method::GET, &format!("/books/search/{needle}"), None, None)
            .await?;
        assert_eq!(status, StatusCode::OK);
        let hits = body.as_array().unwrap();
        assert_eq!(hits.len(), 1, "needle {needle}");
        assert_eq!(hits[0]["title"], "Dune");
    }

    let (_, body) = app
        .request(Method::GET, "/books/search/neuromancer", None, None)
        .await?;
    assert_eq!(body.as_array().unwrap().len(), 0);

    Ok(())
}
