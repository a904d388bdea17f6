#[suitest::suite(integration_tests)]
#[suitest::suite_cfg(sequential = true)]
mod catalog_service_integration_tests {
    use crate::{
        app::{
            document::store::FsDocumentStore,
            service::CatalogService,
            test::{init_postgres, PostgresContainer},
        },
        core::{
            model::{
                document::{Document, DocumentUpdate},
                Pagination,
            },
            service::document::dto::{DocumentUpload, ThumbnailUpload},
        },
        error::ShelfErr,
    };
    use crate::app::server::router::tests::{
        body_json, get, multipart_request, test_router, Part,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use std::path::Path;
    use suitest::{after_all, before_all, cleanup};
    use tower::ServiceExt;

    const TEST_UPLOAD_PATH: &str = "__catalog_service_test_upload__";
    const PDF: &[u8] = b"%PDF-1.4 test document";
    const PNG: &[u8] = b"\x89PNG test thumbnail";

    #[before_all]
    async fn setup() -> (CatalogService, PostgresContainer) {
        let (postgres, pg_img) = init_postgres().await;
        let store = FsDocumentStore::new(TEST_UPLOAD_PATH);
        (CatalogService::new(postgres, store), pg_img)
    }

    #[cleanup]
    async fn cleanup() {
        let _ = tokio::fs::remove_dir_all(TEST_UPLOAD_PATH).await;
    }

    #[after_all]
    async fn teardown() {
        let _ = tokio::fs::remove_dir_all(TEST_UPLOAD_PATH).await;
    }

    fn params<'a>(title: &str, category: &str, file_name: &str, file: &'a [u8]) -> DocumentUpload<'a> {
        DocumentUpload {
            title: Some(title.to_string()),
            author: Some("Herbert".to_string()),
            category: Some(category.to_string()),
            description: None,
            file_name: Some(file_name.to_string()),
            file,
            thumbnail: None,
        }
    }

    fn on_disk(path: &str) -> bool {
        Path::new(TEST_UPLOAD_PATH).join(path).exists()
    }

    /// Remove every document so aggregate assertions only see the current test's data.
    async fn clear(service: &CatalogService) {
        let ids: Vec<i64> = service
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();

        if !ids.is_empty() {
            service.batch_delete(&ids).await.unwrap();
        }
    }

    #[test]
    async fn upload_and_get(service: CatalogService) {
        let document = service
            .upload(params("Dune", "scifi", "dune.pdf", PDF))
            .await
            .unwrap();

        assert_eq!("dune.pdf", document.stored_filename);
        assert_eq!(0, document.download_count);
        assert!(on_disk(&document.file_path()));

        let fetched = service.get_document(document.id).await.unwrap();
        assert_eq!(document.title, fetched.title);
        assert_eq!("Herbert", fetched.author);
        assert_eq!("scifi", fetched.category);
        assert_eq!(document.stored_filename, fetched.stored_filename);
        assert_eq!(document.uploaded_at, fetched.uploaded_at);
        assert_eq!(0, fetched.download_count);

        let by_title = service.get_document_by_title("Dune").await.unwrap();
        assert_eq!(document.id, by_title.id);

        service.delete(document.id).await.unwrap();
    }

    #[test]
    async fn upload_sanitizes_file_name(service: CatalogService) {
        let mut upload = params("Sanitized", "misc", "../../my report (final).PDF", PDF);
        upload.description = Some("  A report  ".to_string());

        let document = service.upload(upload).await.unwrap();

        assert_eq!("my_report_final.PDF", document.stored_filename);
        assert_eq!(Some("A report"), document.description.as_deref());
        assert!(on_disk(&document.file_path()));

        service.delete(document.id).await.unwrap();
    }

    #[test]
    async fn invalid_upload_creates_nothing(service: CatalogService) {
        clear(&service).await;

        let error = service
            .upload(params("Notes", "misc", "notes.txt", b"plain"))
            .await
            .unwrap_err();
        assert!(matches!(error.error, ShelfErr::InvalidFile(_)));

        assert!(service.list_all().await.unwrap().is_empty());
        let error = service.get_document_by_title("Notes").await.unwrap_err();
        assert!(matches!(error.error, ShelfErr::DoesNotExist(_)));
    }

    #[test]
    async fn delete_removes_row_and_files(service: CatalogService) {
        let mut upload = params("Deleted", "misc", "deleted.pdf", PDF);
        upload.thumbnail = Some(ThumbnailUpload {
            name: "cover.png",
            file: PNG,
        });

        let document = service.upload(upload).await.unwrap();
        let thumbnail = document.thumbnail_ref.clone().unwrap();
        assert!(on_disk(&document.file_path()));
        assert!(on_disk(&thumbnail));

        service.delete(document.id).await.unwrap();

        let error = service.get_document(document.id).await.unwrap_err();
        assert!(matches!(error.error, ShelfErr::DoesNotExist(_)));
        assert!(!on_disk(&document.file_path()));
        assert!(!on_disk(&thumbnail));
        assert!(!on_disk(&document.storage_key()));

        let error = service.delete(document.id).await.unwrap_err();
        assert!(matches!(error.error, ShelfErr::DoesNotExist(_)));
    }

    #[test]
    async fn delete_tolerates_missing_file(service: CatalogService) {
        let document = service
            .upload(params("Vanished", "misc", "vanished.pdf", PDF))
            .await
            .unwrap();

        let path = Path::new(TEST_UPLOAD_PATH).join(document.file_path());
        tokio::fs::remove_file(path).await.unwrap();

        service.delete(document.id).await.unwrap();

        let error = service.get_document(document.id).await.unwrap_err();
        assert!(matches!(error.error, ShelfErr::DoesNotExist(_)));
    }

    #[test]
    async fn download_increments_count(service: CatalogService) {
        let document = service
            .upload(params("Downloaded", "misc", "downloaded.pdf", PDF))
            .await
            .unwrap();

        for expected in 1..=3 {
            let (downloaded, content) = service.download(document.id).await.unwrap();
            assert_eq!(expected, downloaded.download_count);
            assert_eq!(PDF, &content[..]);
        }

        let downloads = (0..10).map(|_| service.download(document.id));
        for result in futures_util::future::join_all(downloads).await {
            result.unwrap();
        }

        let document = service.get_document(document.id).await.unwrap();
        assert_eq!(13, document.download_count);

        service.delete(document.id).await.unwrap();
    }

    #[test]
    async fn failed_download_is_not_counted(service: CatalogService) {
        let document = service
            .upload(params("Unreadable", "misc", "unreadable.pdf", PDF))
            .await
            .unwrap();

        let path = Path::new(TEST_UPLOAD_PATH).join(document.file_path());
        tokio::fs::remove_file(path).await.unwrap();

        let error = service.download(document.id).await.unwrap_err();
        assert!(matches!(error.error, ShelfErr::DoesNotExist(_)));

        let document = service.get_document(document.id).await.unwrap();
        assert_eq!(0, document.download_count);

        let error = service.download(i64::MAX).await.unwrap_err();
        assert!(matches!(error.error, ShelfErr::DoesNotExist(_)));

        service.delete(document.id).await.unwrap();
    }

    #[test]
    async fn search_is_case_insensitive(service: CatalogService) {
        clear(&service).await;

        let mut upload = params("Dune Messiah", "scifi", "messiah.pdf", PDF);
        upload.description = Some("Sequel to the desert planet saga".to_string());
        let document = service.upload(upload).await.unwrap();

        for query in ["dune", "MESSIAH", "herb", "SciFi", "Desert Planet"] {
            let found = service.search(query).await.unwrap();
            assert_eq!(1, found.total, "{query}");
            assert_eq!(document.id, found.items[0].id, "{query}");
        }

        let found = service.search("no such document").await.unwrap();
        assert_eq!(0, found.total);
        assert!(found.items.is_empty());

        // Wildcards are matched literally.
        let found = service.search("%").await.unwrap();
        assert_eq!(0, found.total);

        service.delete(document.id).await.unwrap();
    }

    #[test]
    async fn batch_delete_skips_missing(service: CatalogService) {
        let first = service
            .upload(params("First", "misc", "first.pdf", PDF))
            .await
            .unwrap();
        let second = service
            .upload(params("Second", "misc", "second.pdf", PDF))
            .await
            .unwrap();

        let deleted = service
            .batch_delete(&[first.id, i64::MAX, second.id])
            .await
            .unwrap();

        assert_eq!(2, deleted);
        for document in [first, second] {
            let error = service.get_document(document.id).await.unwrap_err();
            assert!(matches!(error.error, ShelfErr::DoesNotExist(_)));
            assert!(!on_disk(&document.storage_key()));
        }
    }

    #[test]
    async fn concurrent_batch_deletes_exceeding_pool(service: CatalogService) {
        // More concurrent calls than the pool's default 10 connections.
        let mut documents = vec![];
        for i in 0..12 {
            let title = format!("Concurrent {i}");
            let file_name = format!("concurrent_{i}.pdf");
            documents.push(
                service
                    .upload(params(&title, "misc", &file_name, PDF))
                    .await
                    .unwrap(),
            );
        }

        let deletes = documents
            .iter()
            .map(|document| service.batch_delete(std::slice::from_ref(&document.id)));

        let mut deleted = 0;
        for result in futures_util::future::join_all(deletes).await {
            deleted += result.unwrap();
        }

        assert_eq!(12, deleted);
        for document in documents {
            assert!(!on_disk(&document.storage_key()));
        }
    }

    #[test]
    async fn update_keeps_file_downloadable(service: CatalogService) {
        let mut upload = params("Old title", "misc", "renamed.pdf", PDF);
        upload.description = Some("To be cleared".to_string());
        let document = service.upload(upload).await.unwrap();

        let update = DocumentUpdate {
            title: Some("New title".to_string()),
            description: Some(String::new()),
            ..Default::default()
        };
        let updated = service.update(document.id, update).await.unwrap();

        assert_eq!("New title", updated.title);
        assert_eq!("Herbert", updated.author);
        assert_eq!(None, updated.description);
        assert_eq!(document.stored_filename, updated.stored_filename);

        let (_, content) = service.download(document.id).await.unwrap();
        assert_eq!(PDF, &content[..]);

        let error = service
            .update(
                i64::MAX,
                DocumentUpdate {
                    title: Some("Nobody".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error.error, ShelfErr::DoesNotExist(_)));

        service.delete(document.id).await.unwrap();
    }

    #[test]
    async fn thumbnails(service: CatalogService) {
        let mut upload = params("Illustrated", "art", "illustrated.pdf", PDF);
        upload.thumbnail = Some(ThumbnailUpload {
            name: "cover.png",
            file: PNG,
        });
        let illustrated = service.upload(upload).await.unwrap();

        let expected = format!("{}/_thumbnail.png", illustrated.id);
        assert_eq!(Some(expected.as_str()), illustrated.thumbnail_ref.as_deref());

        let (_, content) = service.thumbnail(illustrated.id).await.unwrap();
        assert_eq!(PNG, &content[..]);

        // Disallowed thumbnails are skipped, the document is still stored.
        let mut upload = params("Plain", "art", "plain.pdf", PDF);
        upload.thumbnail = Some(ThumbnailUpload {
            name: "cover.gif",
            file: b"GIF89a",
        });
        let plain = service.upload(upload).await.unwrap();
        assert!(plain.thumbnail_ref.is_none());

        let error = service.thumbnail(plain.id).await.unwrap_err();
        assert!(matches!(error.error, ShelfErr::DoesNotExist(_)));

        service.batch_delete(&[illustrated.id, plain.id]).await.unwrap();
    }

    #[test]
    async fn listing_and_filters(service: CatalogService) {
        clear(&service).await;

        let mut ids = vec![];
        for (title, category, author) in [
            ("Foundation", "scifi", "asimov"),
            ("Emma", "classics", "austen"),
            ("Persuasion", "classics", "austen"),
        ] {
            let mut upload = params(title, category, &format!("{title}.pdf"), PDF);
            upload.author = Some(author.to_string());
            ids.push(service.upload(upload).await.unwrap().id);
        }

        let page = service
            .list_documents(Pagination::new(2, 1))
            .await
            .unwrap();
        assert_eq!(3, page.total);
        assert_eq!(ids[..2], page.items.iter().map(|d| d.id).collect::<Vec<_>>());

        let page = service
            .list_documents(Pagination::new(2, 2))
            .await
            .unwrap();
        assert_eq!(3, page.total);
        assert_eq!(vec![ids[2]], page.items.iter().map(|d| d.id).collect::<Vec<_>>());

        let classics = service.filter_by_category("classics").await.unwrap();
        assert_eq!(2, classics.total);
        assert_eq!(0, service.filter_by_category("Classics").await.unwrap().total);

        let asimov = service.filter_by_author("asimov").await.unwrap();
        assert_eq!(vec![ids[0]], asimov.items.iter().map(|d| d.id).collect::<Vec<_>>());

        assert_eq!(
            vec!["classics", "scifi"],
            service.list_categories().await.unwrap()
        );
        assert_eq!(vec!["asimov", "austen"], service.list_authors().await.unwrap());

        service.batch_delete(&ids).await.unwrap();
    }

    #[test]
    async fn stats(service: CatalogService) {
        clear(&service).await;

        let mut documents: Vec<Document> = vec![];
        for (title, category) in [("One", "a"), ("Two", "a"), ("Three", "b")] {
            let document = service
                .upload(params(title, category, &format!("{title}.pdf"), PDF))
                .await
                .unwrap();
            documents.push(document);
        }

        for _ in 0..2 {
            service.download(documents[1].id).await.unwrap();
        }
        service.download(documents[2].id).await.unwrap();

        let stats = service.stats().await.unwrap();

        assert_eq!(3, stats.total);
        assert_eq!(Some(&2), stats.per_category.get("a"));
        assert_eq!(Some(&1), stats.per_category.get("b"));
        assert_eq!(Some(&3), stats.per_author.get("Herbert"));

        let top: Vec<i64> = stats.top_downloaded.iter().map(|d| d.id).collect();
        assert_eq!(vec![documents[1].id, documents[2].id, documents[0].id], top);

        let mut recent: Vec<i64> = stats.most_recent.iter().map(|d| d.id).collect();
        recent.sort();
        assert_eq!(documents.iter().map(|d| d.id).collect::<Vec<_>>(), recent);

        let ids: Vec<i64> = documents.iter().map(|d| d.id).collect();
        service.batch_delete(&ids).await.unwrap();
    }

    #[test]
    async fn http_round_trip(service: CatalogService) {
        let router = test_router(service.clone());

        let form = [
            Part::text("title", "Dune over HTTP"),
            Part::text("author", "Herbert"),
            Part::text("category", "scifi"),
            Part::file("file", "dune http.pdf", PDF),
            Part::file("thumbnail", "cover.png", PNG),
        ];
        let response = router
            .clone()
            .oneshot(multipart_request("/api/upload", &form))
            .await
            .unwrap();
        assert_eq!(StatusCode::CREATED, response.status());

        let document = body_json(response).await;
        let id = document["id"].as_i64().unwrap();
        assert_eq!("dune_http.pdf", document["stored_filename"]);
        assert_eq!(0, document["download_count"]);

        let response = router
            .clone()
            .oneshot(get(&format!("/api/download/{id}")))
            .await
            .unwrap();
        assert_eq!(StatusCode::OK, response.status());
        assert_eq!("application/pdf", response.headers()[header::CONTENT_TYPE]);
        assert_eq!(
            "attachment; filename=\"dune_http.pdf\"",
            response.headers()[header::CONTENT_DISPOSITION]
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(PDF, &bytes[..]);

        let response = router
            .clone()
            .oneshot(get(&format!("/api/thumbnail/{id}")))
            .await
            .unwrap();
        assert_eq!(StatusCode::OK, response.status());
        assert_eq!("image/png", response.headers()[header::CONTENT_TYPE]);

        let response = router.clone().oneshot(get("/books")).await.unwrap();
        assert_eq!(StatusCode::OK, response.status());
        let books = body_json(response).await;
        let book = books
            .as_array()
            .unwrap()
            .iter()
            .find(|book| book["book_name"] == "Dune over HTTP")
            .unwrap();
        assert_eq!(format!("/api/download/{id}"), book["file_name"]);
        assert_eq!(format!("/api/thumbnail/{id}"), book["cover_photo"]);

        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/pdfs/{id}"))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(StatusCode::NO_CONTENT, response.status());

        let response = router
            .oneshot(get(&format!("/api/pdfs/{id}")))
            .await
            .unwrap();
        assert_eq!(StatusCode::NOT_FOUND, response.status());
    }
}
