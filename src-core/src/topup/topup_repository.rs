use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::topup_model::{NewTopUpIntent, TopUpIntent, TopUpStatus};
use super::topup_traits::TopUpRepositoryTrait;
use crate::errors::Result;
use crate::schema::topup_intents;

pub struct TopUpRepository;

impl TopUpRepository {
    pub fn new() -> Self {
        TopUpRepository
    }
}

impl Default for TopUpRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TopUpRepositoryTrait for TopUpRepository {
    fn insert_intent_with_conn(
        &self,
        conn: &mut SqliteConnection,
        new_intent: NewTopUpIntent,
    ) -> Result<TopUpIntent> {
        diesel::insert_into(topup_intents::table)
            .values(&new_intent)
            .execute(conn)?;

        Ok(topup_intents::table
            .find(&new_intent.id)
            .first::<TopUpIntent>(conn)?)
    }

    fn find_by_reference_with_conn(
        &self,
        conn: &mut SqliteConnection,
        external_reference: &str,
    ) -> Result<Option<TopUpIntent>> {
        Ok(topup_intents::table
            .filter(topup_intents::external_reference.eq(external_reference))
            .first::<TopUpIntent>(conn)
            .optional()?)
    }

    fn set_status_with_conn(
        &self,
        conn: &mut SqliteConnection,
        intent_id: &str,
        status: TopUpStatus,
    ) -> Result<TopUpIntent> {
        diesel::update(topup_intents::table.find(intent_id))
            .set((
                topup_intents::status.eq(status.as_str()),
                topup_intents::updated_at.eq(Utc::now().to_rfc3339()),
            ))
            .execute(conn)?;

        Ok(topup_intents::table
            .find(intent_id)
            .first::<TopUpIntent>(conn)?)
    }
}
