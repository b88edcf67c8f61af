use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::kyiv;
use crate::predictions::generator::PredictionGenerator;
use crate::predictions::repo::PredictionStore;
use crate::predictions::repo_types::{NewPrediction, Prediction};

/// Who is asking, as extracted from the Mini App payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub telegram_id: i64,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPrediction {
    pub text: String,
    pub created_at: OffsetDateTime,
    pub cached: bool,
}

impl DailyPrediction {
    fn from_row(row: Prediction, cached: bool) -> Self {
        Self {
            text: row.text,
            created_at: row.created_at,
            cached,
        }
    }
}

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct PredictionService {
    store: Arc<dyn PredictionStore>,
    generator: Arc<dyn PredictionGenerator>,
}

impl PredictionService {
    pub fn new(store: Arc<dyn PredictionStore>, generator: Arc<dyn PredictionGenerator>) -> Self {
        Self { store, generator }
    }

    /// Today's prediction for `identity`, generating one if the Kyiv day has
    /// none yet.
    #[instrument(skip(self, identity), fields(telegram_id = identity.telegram_id))]
    pub async fn get_or_create_daily(
        &self,
        identity: &Identity,
        now: OffsetDateTime,
    ) -> Result<DailyPrediction, PredictionError> {
        let user = self
            .store
            .upsert_user(identity.telegram_id, identity.first_name.as_deref())
            .await?;

        let since = kyiv::start_of_day(now);
        if let Some(existing) = self.store.latest_since(user.id, since).await? {
            return Ok(DailyPrediction::from_row(existing, true));
        }

        let text = self.generator.generate(identity.first_name.as_deref()).await;
        let inserted = self
            .store
            .insert_prediction(NewPrediction {
                user_id: user.id,
                text: &text,
                kyiv_day: kyiv::civil_date(now),
                created_at: now,
            })
            .await?;

        match inserted {
            Some(row) => {
                info!(user_id = %user.id, "prediction created");
                Ok(DailyPrediction::from_row(row, false))
            }
            None => {
                // A concurrent request for the same user won the day.
                let winner = self
                    .store
                    .latest_since(user.id, since)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("prediction for today vanished after conflict"))?;
                Ok(DailyPrediction::from_row(winner, true))
            }
        }
    }
}
