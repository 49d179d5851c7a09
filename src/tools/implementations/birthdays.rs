// list_birthdays - active students with a birthday in a given month

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Local};
use serde_json::{json, Value};

use crate::db::{Filter, OrderDirection, SupabaseClient};
use crate::tools::registry::Tool;

pub struct ListBirthdaysTool {
    db: SupabaseClient,
}

impl ListBirthdaysTool {
    pub fn new(db: SupabaseClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for ListBirthdaysTool {
    fn name(&self) -> &str {
        "list_birthdays"
    }

    fn description(&self) -> &str {
        "Lista aniversariantes de um mês específico ou do mês atual."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "month": {
                    "type": "integer",
                    "description": "Número do mês (1-12). Se não informado, usa o mês atual."
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let month = args["month"]
            .as_u64()
            .unwrap_or_else(|| Local::now().month() as u64);

        let students = self
            .db
            .table("alunos")
            .select("id, nome, aniversario_dia, aniversario_mes, telefone")
            .filter("aniversario_mes", Filter::Eq(json!(month)))
            .filter("status_pedagogico", Filter::eq("ativo"))
            .order("aniversario_dia", OrderDirection::Ascending)
            .fetch()
            .await;

        Ok(Value::Array(students))
    }
}
