//! Tests for the catalog service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockMovieRepository;

#[fixture]
fn draft() -> MovieDraft {
    MovieDraft {
        title: "Inception".into(),
        genre: "Sci-Fi".into(),
        duration_minutes: 148,
        rating: 8.8,
        release_year: 2010,
    }
}

fn stored(id: i64, title: &str) -> Movie {
    Movie::new(
        MovieId::new(id),
        MovieDraft {
            title: title.into(),
            ..draft()
        },
    )
    .expect("valid movie")
}

fn service(repo: MockMovieRepository) -> CatalogService<MockMovieRepository> {
    CatalogService::new(Arc::new(repo))
}

#[rstest]
#[tokio::test]
async fn create_inserts_new_title(draft: MovieDraft) {
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_title()
        .with(eq("Inception"))
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_insert()
        .times(1)
        .return_once(|_| Ok(stored(1, "Inception")));

    let movie = service(repo).create(draft).await.expect("create succeeds");

    assert_eq!(movie.id(), MovieId::new(1));
    assert_eq!(movie.title(), "Inception");
}

#[rstest]
#[tokio::test]
async fn create_rejects_existing_title(draft: MovieDraft) {
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_title()
        .times(1)
        .return_once(|_| Ok(Some(stored(1, "Inception"))));
    repo.expect_insert().times(0);

    let err = service(repo).create(draft).await.expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "Movie with title Inception already exists");
}

#[rstest]
#[tokio::test]
async fn create_maps_racing_duplicate_to_conflict(draft: MovieDraft) {
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_title().return_once(|_| Ok(None));
    repo.expect_insert()
        .return_once(|_| Err(MovieRepositoryError::duplicate_title("Inception")));

    let err = service(repo).create(draft).await.expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_validates_before_touching_storage(mut draft: MovieDraft) {
    draft.release_year = 1850;
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_title().times(0);
    repo.expect_insert().times(0);

    let err = service(repo).create(draft).await.expect_err("invalid");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|d| d.get("field")),
        Some(&serde_json::json!("releaseYear"))
    );
}

#[rstest]
#[case(MovieRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(MovieRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_are_mapped(
    #[case] failure: MovieRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockMovieRepository::new();
    repo.expect_list().return_once(move || Err(failure));

    let err = service(repo).list().await.expect_err("failure");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn find_by_id_reports_missing_movie() {
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_id()
        .with(eq(MovieId::new(999)))
        .return_once(|_| Ok(None));

    let err = service(repo)
        .find_by_id(MovieId::new(999))
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Movie with ID 999 not found");
}

#[rstest]
#[tokio::test]
async fn update_applies_provided_fields() {
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_title()
        .with(eq("Inception"))
        .return_once(|_| Ok(Some(stored(1, "Inception"))));
    repo.expect_update()
        .withf(|id, update| {
            *id == MovieId::new(1) && update.rating == Some(9.0) && update.title.is_none()
        })
        .times(1)
        .return_once(|_, _| Ok(Some(stored(1, "Inception"))));

    let update = MovieUpdate {
        rating: Some(9.0),
        ..MovieUpdate::default()
    };
    service(repo)
        .update("Inception", update)
        .await
        .expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn update_of_unknown_title_is_not_found() {
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_title().return_once(|_| Ok(None));
    repo.expect_update().times(0);

    let err = service(repo)
        .update("Tenet", MovieUpdate::default())
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn empty_update_is_a_no_op() {
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_title()
        .return_once(|_| Ok(Some(stored(1, "Inception"))));
    repo.expect_update().times(0);

    service(repo)
        .update("Inception", MovieUpdate::default())
        .await
        .expect("no-op succeeds");
}

#[rstest]
#[tokio::test]
async fn rename_onto_taken_title_conflicts() {
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_title()
        .with(eq("Inception"))
        .return_once(|_| Ok(Some(stored(1, "Inception"))));
    repo.expect_find_by_title()
        .with(eq("Tenet"))
        .return_once(|_| Ok(Some(stored(2, "Tenet"))));
    repo.expect_update().times(0);

    let update = MovieUpdate {
        title: Some("Tenet".into()),
        ..MovieUpdate::default()
    };
    let err = service(repo)
        .update("Inception", update)
        .await
        .expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn update_of_vanished_row_is_not_found() {
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_title()
        .return_once(|_| Ok(Some(stored(1, "Inception"))));
    repo.expect_update().return_once(|_, _| Ok(None));

    let update = MovieUpdate {
        genre: Some("Thriller".into()),
        ..MovieUpdate::default()
    };
    let err = service(repo)
        .update("Inception", update)
        .await
        .expect_err("vanished");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn remove_deletes_resolved_movie() {
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_title()
        .return_once(|_| Ok(Some(stored(4, "Inception"))));
    repo.expect_delete()
        .with(eq(MovieId::new(4)))
        .times(1)
        .return_once(|_| Ok(true));

    service(repo)
        .remove("Inception")
        .await
        .expect("remove succeeds");
}

#[rstest]
#[tokio::test]
async fn remove_of_unknown_title_is_not_found() {
    let mut repo = MockMovieRepository::new();
    repo.expect_find_by_title().return_once(|_| Ok(None));
    repo.expect_delete().times(0);

    let err = service(repo).remove("Tenet").await.expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Movie with title Tenet not found");
}
