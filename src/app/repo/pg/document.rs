use crate::{
    core::{
        model::{
            document::{Document, DocumentInsert, DocumentUpdate},
            List, Pagination,
        },
        repo::{document::DocumentRepo, Atomic},
    },
    error::ShelfError,
    map_err,
};
use sqlx::PgPool;

impl DocumentRepo for PgPool {
    async fn get_by_id(&self, id: i64) -> Result<Option<Document>, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "SELECT id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count
                 FROM documents
                 WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(self)
            .await
        ))
    }

    async fn get_by_id_tx(
        &self,
        id: i64,
        tx: &mut <Self as Atomic>::Tx,
    ) -> Result<Option<Document>, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "SELECT id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count
                 FROM documents
                 WHERE id = $1
                 FOR UPDATE",
            )
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
        ))
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<Document>, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "SELECT id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count
                 FROM documents
                 WHERE title = $1
                 ORDER BY id
                 LIMIT 1",
            )
            .bind(title)
            .fetch_optional(self)
            .await
        ))
    }

    async fn list(&self, p: Pagination) -> Result<List<Document>, ShelfError> {
        let total = self.count().await?;

        let (limit, offset) = p.to_limit_offset();

        let documents = map_err!(
            sqlx::query_as::<_, Document>(
                "SELECT id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count
                 FROM documents
                 ORDER BY id
                 LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(self)
            .await
        );

        Ok(List::new(total as usize, documents))
    }

    async fn list_all(&self) -> Result<Vec<Document>, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "SELECT id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count
                 FROM documents
                 ORDER BY id",
            )
            .fetch_all(self)
            .await
        ))
    }

    async fn search(&self, query: &str) -> Result<Vec<Document>, ShelfError> {
        let pattern = format!("%{}%", escape_like(query));

        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "SELECT id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count
                 FROM documents
                 WHERE title ILIKE $1
                    OR author ILIKE $1
                    OR category ILIKE $1
                    OR description ILIKE $1
                 ORDER BY id",
            )
            .bind(pattern)
            .fetch_all(self)
            .await
        ))
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Document>, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "SELECT id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count
                 FROM documents
                 WHERE category = $1
                 ORDER BY id",
            )
            .bind(category)
            .fetch_all(self)
            .await
        ))
    }

    async fn list_by_author(&self, author: &str) -> Result<Vec<Document>, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "SELECT id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count
                 FROM documents
                 WHERE author = $1
                 ORDER BY id",
            )
            .bind(author)
            .fetch_all(self)
            .await
        ))
    }

    async fn list_categories(&self) -> Result<Vec<String>, ShelfError> {
        Ok(map_err!(
            sqlx::query_scalar::<_, String>(
                "SELECT DISTINCT category FROM documents ORDER BY category"
            )
            .fetch_all(self)
            .await
        ))
    }

    async fn list_authors(&self) -> Result<Vec<String>, ShelfError> {
        Ok(map_err!(
            sqlx::query_scalar::<_, String>("SELECT DISTINCT author FROM documents ORDER BY author")
                .fetch_all(self)
                .await
        ))
    }

    async fn count(&self) -> Result<i64, ShelfError> {
        Ok(map_err!(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM documents")
                .fetch_one(self)
                .await
        ))
    }

    async fn count_by_category(&self) -> Result<Vec<(String, i64)>, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, (String, i64)>(
                "SELECT category, COUNT(id) FROM documents GROUP BY category ORDER BY category"
            )
            .fetch_all(self)
            .await
        ))
    }

    async fn count_by_author(&self) -> Result<Vec<(String, i64)>, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, (String, i64)>(
                "SELECT author, COUNT(id) FROM documents GROUP BY author ORDER BY author"
            )
            .fetch_all(self)
            .await
        ))
    }

    async fn top_downloaded(&self, limit: i64) -> Result<Vec<Document>, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "SELECT id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count
                 FROM documents
                 ORDER BY download_count DESC, id ASC
                 LIMIT $1",
            )
            .bind(limit)
            .fetch_all(self)
            .await
        ))
    }

    async fn most_recent(&self, limit: i64) -> Result<Vec<Document>, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "SELECT id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count
                 FROM documents
                 ORDER BY uploaded_at DESC, id ASC
                 LIMIT $1",
            )
            .bind(limit)
            .fetch_all(self)
            .await
        ))
    }

    async fn insert(
        &self,
        params: DocumentInsert<'_>,
        tx: &mut <Self as Atomic>::Tx,
    ) -> Result<Document, ShelfError> {
        let DocumentInsert {
            title,
            author,
            category,
            description,
            stored_filename,
        } = params;

        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "INSERT INTO documents(title, author, category, description, stored_filename)
                 VALUES($1, $2, $3, $4, $5)
                 RETURNING id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count",
            )
            .bind(title)
            .bind(author)
            .bind(category)
            .bind(description)
            .bind(stored_filename)
            .fetch_one(&mut **tx)
            .await
        ))
    }

    async fn set_thumbnail(
        &self,
        id: i64,
        thumbnail_ref: &str,
        tx: &mut <Self as Atomic>::Tx,
    ) -> Result<Document, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "UPDATE documents SET thumbnail_ref = $2
                 WHERE id = $1
                 RETURNING id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count",
            )
            .bind(id)
            .bind(thumbnail_ref)
            .fetch_one(&mut **tx)
            .await
        ))
    }

    async fn update(
        &self,
        id: i64,
        document: &DocumentUpdate,
    ) -> Result<Option<Document>, ShelfError> {
        let DocumentUpdate {
            title,
            author,
            category,
            description,
        } = document;

        // An empty description clears it.
        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "UPDATE documents SET
                    title = COALESCE($2, title),
                    author = COALESCE($3, author),
                    category = COALESCE($4, category),
                    description = CASE WHEN $5::TEXT IS NULL THEN description ELSE NULLIF($5::TEXT, '') END
                 WHERE id = $1
                 RETURNING id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count",
            )
            .bind(id)
            .bind(title.as_deref())
            .bind(author.as_deref())
            .bind(category.as_deref())
            .bind(description.as_deref())
            .fetch_optional(self)
            .await
        ))
    }

    async fn increment_downloads(
        &self,
        id: i64,
        tx: &mut <Self as Atomic>::Tx,
    ) -> Result<Option<Document>, ShelfError> {
        Ok(map_err!(
            sqlx::query_as::<_, Document>(
                "UPDATE documents SET download_count = download_count + 1
                 WHERE id = $1
                 RETURNING id, title, author, category, description, stored_filename, thumbnail_ref, uploaded_at, download_count",
            )
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
        ))
    }

    async fn remove_by_id(&self, id: i64) -> Result<u64, ShelfError> {
        let result = map_err!(
            sqlx::query("DELETE FROM documents WHERE id = $1")
                .bind(id)
                .execute(self)
                .await
        );
        Ok(result.rows_affected())
    }

    async fn remove_by_id_tx(
        &self,
        id: i64,
        tx: &mut <Self as Atomic>::Tx,
    ) -> Result<u64, ShelfError> {
        let result = map_err!(
            sqlx::query("DELETE FROM documents WHERE id = $1")
                .bind(id)
                .execute(&mut **tx)
                .await
        );
        Ok(result.rows_affected())
    }
}

/// Escape the `LIKE` wildcards in `input` so it is matched literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
