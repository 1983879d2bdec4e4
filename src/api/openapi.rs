//! `GET /openapi.json`: a hand-maintained OpenAPI 3 description.

use axum::Json;
use serde_json::{Map, Value, json};

use crate::domain::applicant::{ApplicantRecord, Choice, Education, Gender, Housing, LoanPurpose, PriorDefault, columns};

pub async fn document() -> Json<Value> {
    Json(openapi())
}

pub fn openapi() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "API de Classificação de Empréstimos",
            "description": "Uma API para prever a aprovação de empréstimos com base nos dados do cliente",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/": {"get": {"tags": ["Root"], "summary": "Read Root", "responses": ok_response()}},
            "/health": {"get": {"tags": ["Status"], "summary": "Health Check", "responses": ok_response()}},
            "/predict": {"post": {
                "tags": ["Prediction"],
                "summary": "Predict",
                "requestBody": {
                    "required": true,
                    "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ClassificacaoEmprestimoDTO"}}}
                },
                "responses": {
                    "200": {"description": "Successful Response", "content": {"application/json": {
                        "schema": {"$ref": "#/components/schemas/PredictionResult"}
                    }}},
                    "422": {"description": "Validation Error"},
                    "500": {"description": "Inference Error"},
                    "503": {"description": "Model Unavailable"}
                }
            }}
        },
        "components": {"schemas": {
            "ClassificacaoEmprestimoDTO": applicant_schema(),
            "PredictionResult": {
                "type": "object",
                "required": ["prediction_status", "probability_approved"],
                "properties": {
                    "prediction_status": {"type": "string", "enum": ["aprovado", "negado"]},
                    "probability_approved": {"type": "string", "pattern": "^\\d{1,3}\\.\\d{2}%$"}
                }
            }
        }}
    })
}

fn ok_response() -> Value {
    json!({"200": {"description": "Successful Response"}})
}

fn integer(min: i64, exclusive: bool) -> Value {
    if exclusive {
        json!({"type": "integer", "exclusiveMinimum": min})
    } else {
        json!({"type": "integer", "minimum": min})
    }
}

fn positive_number() -> Value {
    json!({"type": "number", "exclusiveMinimum": 0})
}

fn literal<T: Choice>() -> Value {
    json!({"type": "string", "enum": T::labels()})
}

fn applicant_schema() -> Value {
    let mut properties = Map::new();
    properties.insert(columns::AGE.into(), integer(0, true));
    properties.insert(columns::GENDER.into(), literal::<Gender>());
    properties.insert(columns::EDUCATION.into(), literal::<Education>());
    properties.insert(columns::ANNUAL_INCOME.into(), positive_number());
    properties.insert(columns::EXPERIENCE_YEARS.into(), integer(0, false));
    properties.insert(columns::HOUSING.into(), literal::<Housing>());
    properties.insert(columns::LOAN_AMOUNT.into(), positive_number());
    properties.insert(columns::LOAN_PURPOSE.into(), literal::<LoanPurpose>());
    properties.insert(columns::INTEREST_RATE.into(), positive_number());
    properties.insert(
        columns::INCOME_COMMITTED.into(),
        json!({"type": "number", "minimum": 0, "maximum": 1}),
    );
    properties.insert(columns::CREDIT_HISTORY_YEARS.into(), integer(0, true));
    properties.insert(columns::CREDIT_SCORE.into(), integer(0, true));
    properties.insert(columns::PRIOR_DEFAULT.into(), literal::<PriorDefault>());
    properties.insert(columns::INSTALLMENTS.into(), integer(0, true));

    json!({
        "type": "object",
        "required": columns::ALL,
        "properties": properties,
        "example": ApplicantRecord::example(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_covers_every_column() {
        let doc = openapi();
        let schema = &doc["components"]["schemas"]["ClassificacaoEmprestimoDTO"];
        for column in columns::ALL {
            assert!(schema["properties"].get(column).is_some(), "missing {column}");
        }
        assert_eq!(schema["required"].as_array().unwrap().len(), 14);
        assert_eq!(schema["example"]["genero"], "feminino");
        assert_eq!(schema["properties"]["escolaridade"]["enum"][0], "ensino_medio");
    }
}
