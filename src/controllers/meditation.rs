use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::meditation::{
        GenerateMeditationRequest, GenerateMeditationResponse, MeditationService,
        MeditationServiceApi, MeditationServiceError,
    },
    error::{AppError, AppResult},
    infrastructure::auth::SharedSecret,
};

pub struct MeditationController {
    meditation_service: Arc<MeditationService>,
    secret: SharedSecret,
}

impl MeditationController {
    pub fn new(meditation_service: Arc<MeditationService>, secret: SharedSecret) -> Self {
        Self {
            meditation_service,
            secret,
        }
    }

    /// POST /api/generate-meditation - Generate a guided meditation and its audio
    pub async fn generate(
        State(controller): State<Arc<MeditationController>>,
        Json(request): Json<GenerateMeditationRequest>,
    ) -> AppResult<Json<GenerateMeditationResponse>> {
        controller.secret.verify(&request.password)?;

        let prompt = request.to_prompt().ok_or_else(|| {
            AppError::from(MeditationServiceError::Invalid(
                "Missing required fields".to_string(),
            ))
        })?;

        let result = controller.meditation_service.generate(prompt).await?;

        Ok(Json(GenerateMeditationResponse::from(result)))
    }
}
