use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faqs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub question: String,
    pub answer: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate(question: &str, answer: &str) -> Result<(), errors::ModelError> {
    validation::require("question", question)?;
    validation::require("answer", answer)?;
    validation::max_len("question", question, 255)
}

pub async fn create(db: &DatabaseConnection, question: &str, answer: &str) -> Result<Model, errors::ModelError> {
    validate(question, answer)?;
    let am = ActiveModel {
        question: Set(question.trim().to_string()),
        answer: Set(answer.to_string()),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from)
}
