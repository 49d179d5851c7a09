// list_attendance - absences and presence records
//
// Date range defaults to the current calendar week (Monday through Sunday).
// Lessons are fetched first, then the attendance rows for those lessons;
// the student-name filter runs after retrieval since it targets a joined
// attribute.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde_json::{json, Value};

use crate::db::{Filter, SupabaseClient};
use crate::tools::registry::Tool;

/// Monday and Sunday of the week containing `today`.
pub(crate) fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

pub struct ListAttendanceTool {
    db: SupabaseClient,
}

impl ListAttendanceTool {
    pub fn new(db: SupabaseClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Tool for ListAttendanceTool {
    fn name(&self) -> &str {
        "list_attendance"
    }

    fn description(&self) -> &str {
        "Busca informações sobre faltas e presenças. Use para perguntas como \
         'quem faltou essa semana', 'faltas do aluno X', etc."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "student_name": {
                    "type": "string",
                    "description": "Nome do aluno para ver faltas"
                },
                "class_name": {
                    "type": "string",
                    "description": "Nome da turma para ver faltas"
                },
                "start_date": {
                    "type": "string",
                    "description": "Data inicial no formato YYYY-MM-DD"
                },
                "end_date": {
                    "type": "string",
                    "description": "Data final no formato YYYY-MM-DD"
                },
                "absences_only": {
                    "type": "boolean",
                    "description": "Se true, retorna apenas registros de falta (presente=false)"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let (week_start, week_end) = week_bounds(Local::now().date_naive());
        let start_date = match args["start_date"].as_str() {
            Some(date) => date.to_string(),
            None => week_start.format("%Y-%m-%d").to_string(),
        };
        let end_date = match args["end_date"].as_str() {
            Some(date) => date.to_string(),
            None => week_end.format("%Y-%m-%d").to_string(),
        };
        let absences_only = args["absences_only"].as_bool().unwrap_or(true);

        let mut lessons_query = self
            .db
            .table("aulas")
            .select("id, data, turma:turmas(id, nome)")
            .filter("data", Filter::Gte(json!(start_date)))
            .filter("data", Filter::Lte(json!(end_date)));

        if let Some(class_name) = args["class_name"].as_str() {
            let classes = self
                .db
                .table("turmas")
                .select("id")
                .filter("nome", Filter::contains(class_name))
                .fetch()
                .await;
            if let Some(class) = classes.first() {
                lessons_query = lessons_query.filter("turma_id", Filter::Eq(class["id"].clone()));
            }
        }

        let lessons = lessons_query.fetch().await;
        if lessons.is_empty() {
            return Ok(json!([]));
        }

        let lesson_ids: Vec<Value> = lessons.iter().map(|lesson| lesson["id"].clone()).collect();

        let mut attendance_query = self
            .db
            .table("presencas")
            .select("*, aluno:alunos(id, nome), aula:aulas(data, turma:turmas(nome))")
            .filter("aula_id", Filter::In(lesson_ids));

        if absences_only {
            attendance_query = attendance_query.filter("presente", Filter::Eq(json!(false)));
        }

        let mut records = attendance_query.fetch().await;

        if let Some(student_name) = args["student_name"].as_str() {
            let needle = student_name.to_lowercase();
            records.retain(|record| {
                record["aluno"]["nome"]
                    .as_str()
                    .map(|nome| nome.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            });
        }

        Ok(Value::Array(records))
    }
}
