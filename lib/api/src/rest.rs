use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};
use simrec_core::{Error, ImageFetcher, ImageRef, ItemId, Recommendation};
use simrec_storage::ArtifactStore;
use std::sync::Arc;

/// Shared state behind every handler
pub struct AppState {
    pub store: Arc<ArtifactStore>,
    pub images: Arc<dyn ImageFetcher>,
}

#[derive(Deserialize)]
struct RecommendRequest {
    title: String,
    k: Option<usize>,
}

#[derive(Serialize)]
struct RecommendResponse {
    query: String,
    results: Vec<RecommendationEntry>,
}

#[derive(Serialize)]
struct RecommendationEntry {
    id: ItemId,
    title: String,
    position: usize,
    score: f32,
    image: ImageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder: Option<&'static str>,
}

impl From<Recommendation> for RecommendResponse {
    fn from(recommendation: Recommendation) -> Self {
        let results = recommendation
            .entries
            .into_iter()
            .map(|entry| RecommendationEntry {
                placeholder: entry.image.is_absent().then_some(ImageRef::PLACEHOLDER),
                id: entry.item.id,
                title: entry.item.title,
                position: entry.item.position,
                score: entry.score,
                image: entry.image,
            })
            .collect();
        Self {
            query: recommendation.query,
            results,
        }
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        store: Arc<ArtifactStore>,
        images: Arc<dyn ImageFetcher>,
        port: u16,
    ) -> std::io::Result<()> {
        let state = web::Data::new(AppState { store, images });

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Route table, shared by the server and tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/titles", web::get().to(list_titles))
        .route("/recommend", web::get().to(recommend_query))
        .route("/recommend", web::post().to(recommend_json));
}

fn error_response(error: &Error) -> HttpResponse {
    let mut builder = match error {
        Error::NotFound(_) => HttpResponse::NotFound(),
        Error::InvalidArgument(_) => HttpResponse::BadRequest(),
        Error::DataUnavailable(_) => HttpResponse::ServiceUnavailable(),
        Error::DataCorrupt(_) | Error::OutOfRange { .. } => HttpResponse::InternalServerError(),
    };
    builder.json(serde_json::json!({
        "error": error.to_string(),
        "results": []
    }))
}

async fn health(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let items = state
        .store
        .recommender()
        .map(|r| r.catalog().size())
        .unwrap_or(0);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "ready": state.store.is_ready(),
        "items": items
    })))
}

async fn list_titles(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match state.store.recommender() {
        Ok(recommender) => {
            let titles: Vec<&str> = recommender.catalog().titles().collect();
            Ok(HttpResponse::Ok().json(titles))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn recommend_query(
    state: web::Data<AppState>,
    req: web::Query<RecommendRequest>,
) -> ActixResult<HttpResponse> {
    recommend(&state, req.into_inner()).await
}

async fn recommend_json(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> ActixResult<HttpResponse> {
    recommend(&state, req.into_inner()).await
}

async fn recommend(state: &AppState, req: RecommendRequest) -> ActixResult<HttpResponse> {
    let recommender = match state.store.recommender() {
        Ok(r) => r,
        Err(e) => return Ok(error_response(&e)),
    };

    let images = state.images.as_ref();
    let recommendation = match req.k {
        Some(k) => recommender.recommend(&req.title, k, images).await,
        None => recommender.recommend_default(&req.title, images).await,
    };

    if let Some(e) = &recommendation.failure {
        return Ok(error_response(e));
    }
    Ok(HttpResponse::Ok().json(RecommendResponse::from(recommendation)))
}
