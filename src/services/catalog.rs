//! Catalog operations over authors, books and ratings.
//!
//! Multi-step mutations (author deletion with orphan cleanup, book
//! creation/update with author-set replacement, rate submission) each run
//! inside one transaction; validation happens before anything persists.

use sqlx::SqlitePool;

use crate::{
    db,
    models::{
        Author, AuthorDeletion, AuthorDetail, AuthorPayload, Book, BookDetail, BookPayload,
        Message, Pagination,
    },
    services::rating,
    Error, Result,
};

pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ----- authors -------------------------------------------------------

    pub async fn create_author(&self, payload: AuthorPayload) -> Result<AuthorDetail> {
        let author = db::authors::insert(&self.pool, &payload).await?;
        tracing::info!(author_id = author.id, "created author");
        Ok(AuthorDetail::new(author, Vec::new()))
    }

    pub async fn list_authors(&self, page: Pagination) -> Result<Vec<AuthorDetail>> {
        let authors = db::authors::list(&self.pool, page.skip, page.limit).await?;
        self.with_books(authors).await
    }

    pub async fn get_author(&self, id: i64) -> Result<AuthorDetail> {
        let author = db::authors::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| Error::NotFound("Author not found".to_string()))?;
        self.author_detail(author).await
    }

    /// Full replace of the author's mutable fields.
    pub async fn update_author(&self, id: i64, payload: AuthorPayload) -> Result<AuthorDetail> {
        let author = db::authors::update(&self.pool, id, &payload)
            .await?
            .ok_or_else(|| Error::NotFound("Author not found".to_string()))?;
        self.author_detail(author).await
    }

    /// Remove an author. Books left without any author afterwards are
    /// deleted too and reported by title.
    pub async fn delete_author(&self, id: i64) -> Result<AuthorDeletion> {
        let mut tx = self.pool.begin().await?;

        if db::authors::find_by_id(&mut *tx, id).await?.is_none() {
            return Err(Error::NotFound("Author not found".to_string()));
        }

        let book_ids = db::books::ids_for_author(&mut *tx, id).await?;
        db::books::unlink_author(&mut *tx, id).await?;

        let mut deleted_books = Vec::new();
        for book_id in book_ids {
            if db::books::author_count(&mut *tx, book_id).await? > 0 {
                continue;
            }
            if let Some(book) = db::books::find_by_id(&mut *tx, book_id).await? {
                db::books::delete(&mut tx, book_id).await?;
                deleted_books.push(book.title);
            }
        }

        db::authors::delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(
            author_id = id,
            orphaned_books = deleted_books.len(),
            "deleted author"
        );
        Ok(AuthorDeletion {
            message: "Author and orphaned books deleted successfully".to_string(),
            deleted_books,
        })
    }

    pub async fn search_authors(&self, text: &str) -> Result<Vec<AuthorDetail>> {
        let authors = db::authors::search(&self.pool, text).await?;
        self.with_books(authors).await
    }

    // ----- books ---------------------------------------------------------

    pub async fn create_book(&self, payload: BookPayload) -> Result<BookDetail> {
        if db::books::find_by_isbn(&self.pool, &payload.isbn)
            .await?
            .is_some()
        {
            return Err(Error::Conflict("ISBN already registered".to_string()));
        }

        let authors = self.resolve_authors(&payload.author_ids).await?;

        let mut tx = self.pool.begin().await?;
        let book = db::books::insert(&mut *tx, &payload).await?;
        db::books::set_authors(&mut tx, book.id, &payload.author_ids).await?;
        tx.commit().await?;

        tracing::info!(book_id = book.id, isbn = %book.isbn, "created book");
        Ok(BookDetail::new(book, authors, Vec::new()))
    }

    pub async fn list_books(&self, page: Pagination) -> Result<Vec<BookDetail>> {
        let books = db::books::list(&self.pool, page.skip, page.limit).await?;
        self.refreshed_details(books).await
    }

    pub async fn get_book(&self, id: i64) -> Result<BookDetail> {
        let mut book = db::books::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| Error::NotFound("Book not found".to_string()))?;

        let mut conn = self.pool.acquire().await?;
        book.rating = rating::recompute_and_store(&mut conn, book.id).await?;
        drop(conn);

        self.book_detail(book).await
    }

    /// Full replace of the book's mutable fields and its author set.
    pub async fn update_book(&self, id: i64, payload: BookPayload) -> Result<BookDetail> {
        if db::books::find_by_id(&self.pool, id).await?.is_none() {
            return Err(Error::NotFound("Book not found".to_string()));
        }
        if let Some(existing) = db::books::find_by_isbn(&self.pool, &payload.isbn).await? {
            if existing.id != id {
                return Err(Error::Conflict("ISBN already registered".to_string()));
            }
        }

        let authors = self.resolve_authors(&payload.author_ids).await?;

        let mut tx = self.pool.begin().await?;
        let book = db::books::update(&mut *tx, id, &payload)
            .await?
            .ok_or_else(|| Error::NotFound("Book not found".to_string()))?;
        db::books::set_authors(&mut tx, id, &payload.author_ids).await?;
        tx.commit().await?;

        let user_ratings = db::ratings::for_book(&self.pool, id).await?;
        Ok(BookDetail::new(book, authors, user_ratings))
    }

    pub async fn delete_book(&self, id: i64) -> Result<Message> {
        let mut tx = self.pool.begin().await?;
        let removed = db::books::delete(&mut tx, id).await?;
        if removed == 0 {
            return Err(Error::NotFound("Book not found".to_string()));
        }
        tx.commit().await?;

        tracing::info!(book_id = id, "deleted book");
        Ok(Message::new("Book deleted successfully"))
    }

    pub async fn search_books(&self, text: &str) -> Result<Vec<BookDetail>> {
        let books = db::books::search(&self.pool, text).await?;
        self.refreshed_details(books).await
    }

    // ----- ratings -------------------------------------------------------

    /// Rate-submission protocol: replace any live rating of this (user,
    /// book) pair, then recompute and persist the aggregate, all in one
    /// transaction.
    pub async fn rate_book(&self, book_id: i64, user_id: i64, value: f64) -> Result<BookDetail> {
        if !(0.0..=5.0).contains(&value) {
            return Err(Error::BadRequest(
                "Rating must be between 0 and 5".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        if db::books::find_by_id(&mut *tx, book_id).await?.is_none() {
            return Err(Error::NotFound("Book not found".to_string()));
        }

        db::ratings::delete_for_user_and_book(&mut *tx, user_id, book_id).await?;
        db::ratings::insert(&mut *tx, user_id, book_id, value).await?;
        rating::recompute_and_store(&mut tx, book_id).await?;
        tx.commit().await?;

        tracing::debug!(book_id, user_id, value, "rating submitted");
        self.get_book(book_id).await
    }

    // ----- helpers -------------------------------------------------------

    /// All-or-nothing author resolution: every id must name an existing
    /// author or the whole operation fails.
    async fn resolve_authors(&self, author_ids: &[i64]) -> Result<Vec<Author>> {
        let authors = db::authors::find_by_ids(&self.pool, author_ids).await?;
        if authors.len() != author_ids.len() {
            return Err(Error::BadRequest(
                "One or more authors not found".to_string(),
            ));
        }
        Ok(authors)
    }

    async fn author_detail(&self, author: Author) -> Result<AuthorDetail> {
        let books = db::books::for_author(&self.pool, author.id).await?;
        Ok(AuthorDetail::new(
            author,
            books.into_iter().map(Into::into).collect(),
        ))
    }

    async fn with_books(&self, authors: Vec<Author>) -> Result<Vec<AuthorDetail>> {
        let mut details = Vec::with_capacity(authors.len());
        for author in authors {
            details.push(self.author_detail(author).await?);
        }
        Ok(details)
    }

    async fn book_detail(&self, book: Book) -> Result<BookDetail> {
        let authors = db::authors::for_book(&self.pool, book.id).await?;
        let user_ratings = db::ratings::for_book(&self.pool, book.id).await?;
        Ok(BookDetail::new(book, authors, user_ratings))
    }

    /// Recompute and persist each book's aggregate before returning it:
    /// the read path favors correctness over read performance and never
    /// trusts the stored value.
    async fn refreshed_details(&self, books: Vec<Book>) -> Result<Vec<BookDetail>> {
        let mut details = Vec::with_capacity(books.len());
        for mut book in books {
            let mut conn = self.pool.acquire().await?;
            book.rating = rating::recompute_and_store(&mut conn, book.id).await?;
            drop(conn);
            details.push(self.book_detail(book).await?);
        }
        Ok(details)
    }
}
