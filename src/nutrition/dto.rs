use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::nutrition::repo_types::{NewNutritionEntry, NutritionEntry};

#[derive(Debug, Serialize)]
pub struct CreatedNutritionResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: NutritionEntry,
}

#[derive(Debug, Serialize)]
pub struct NutritionListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<NutritionEntry>,
}

struct Field {
    wire: &'static str,
    negative_msg: &'static str,
}

const CALORIE: Field = Field {
    wire: "totalCalorie",
    negative_msg: "Calories cannot be negative",
};
const PROTEIN: Field = Field {
    wire: "totalProtien",
    negative_msg: "Protein cannot be negative",
};
const FATS: Field = Field {
    wire: "totalFats",
    negative_msg: "Fats cannot be negative",
};
const CARBS: Field = Field {
    wire: "totalCarbs",
    negative_msg: "Carbs cannot be negative",
};

impl Field {
    /// Null and blank strings count as absent.
    fn lookup<'a>(&self, body: &'a Map<String, Value>) -> Option<&'a Value> {
        body.get(self.wire).filter(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
    }

    fn required(&self, body: &Map<String, Value>) -> Result<f64, AppError> {
        let value = self
            .lookup(body)
            .ok_or_else(|| AppError::Validation(format!("{} is required", self.wire)))?;
        self.non_negative(value)
    }

    /// Falsy values (`false`, `0`, `""`) collapse to `None` like a missing field.
    fn optional(&self, body: &Map<String, Value>) -> Result<Option<f64>, AppError> {
        match self.lookup(body) {
            None => Ok(None),
            Some(v) if is_falsy(v) => Ok(None),
            Some(v) => self.non_negative(v).map(Some),
        }
    }

    /// Numeric strings and booleans are cast to numbers, as form posts carry only text.
    fn non_negative(&self, value: &Value) -> Result<f64, AppError> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
        .ok_or_else(|| AppError::Validation(format!("{} must be a number", self.wire)))?;
        if n < 0.0 {
            return Err(AppError::Validation(self.negative_msg.into()));
        }
        Ok(n)
    }
}

fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

impl NewNutritionEntry {
    /// Checks a raw request body and builds the insertable entry.
    pub fn from_payload(payload: &Value) -> Result<Self, AppError> {
        let body = payload
            .as_object()
            .ok_or_else(|| AppError::Validation("Request body must be a JSON object".into()))?;

        Ok(Self {
            total_calorie: CALORIE.required(body)?,
            total_protein: PROTEIN.required(body)?,
            total_fats: FATS.optional(body)?,
            total_carbs: CARBS.optional(body)?,
        })
    }
}
