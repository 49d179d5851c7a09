// System prompt assembly
//
// The prompt embeds the store schema description and the current-date
// context so the model can resolve relative time references ("essa semana",
// "esse mês") before choosing tools.

use chrono::{Datelike, Duration, NaiveDate};

/// Store schema description, given to the model verbatim.
pub const DATABASE_SCHEMA: &str = r#"## Tabelas do Sistema EduLingua (Escola de Idiomas)

### usuarios
- id: UUID (PK)
- email: VARCHAR(100) - email do usuário
- nome: VARCHAR(100) - nome completo
- perfil: VARCHAR(20) - 'admin' ou 'professor'
- ativo: BOOLEAN

### turmas
- id: UUID (PK)
- nome: VARCHAR(100) - nome da turma (ex: "Inglês Básico - Segunda 19h")
- idioma: VARCHAR(50) - 'Inglês', 'Espanhol', 'Francês'
- professor_id: UUID (FK → usuarios.id) - professor responsável
- horario: VARCHAR(50) - horário das aulas
- dias_semana: VARCHAR(100) - dias da semana
- livro: VARCHAR(150) - livro didático usado

### alunos
- id: UUID (PK)
- nome: VARCHAR(100) - nome completo
- cpf: VARCHAR(14)
- telefone: VARCHAR(20)
- email: VARCHAR(100)
- cidade: VARCHAR(100)
- estado: VARCHAR(2)
- status_pedagogico: VARCHAR(20) - 'ativo', 'trancado', 'concluido'
- status_financeiro: VARCHAR(20) - 'em_dia', 'pendente', 'inadimplente'
- dia_vencimento: INTEGER - dia do mês para pagamento
- valor_mensalidade: NUMERIC(10,2)
- forma_pagamento: VARCHAR(50) - 'PIX', 'Boleto', 'Cartão', etc
- desconto: NUMERIC(5,2) - percentual de desconto
- usa_transporte: BOOLEAN
- aniversario_dia: INTEGER
- aniversario_mes: INTEGER
- data_inicio: DATE

### matriculas
- id: UUID (PK)
- turma_id: UUID (FK → turmas.id)
- aluno_id: UUID (FK → alunos.id)
- status: VARCHAR(20) - 'ativo', 'cancelado'
- data_matricula: TIMESTAMP

### aulas
- id: UUID (PK)
- turma_id: UUID (FK → turmas.id)
- data: DATE - data da aula
- unidade_livro: VARCHAR(150) - unidade/lição trabalhada
- conteudo: TEXT - conteúdo da aula
- observacoes: TEXT

### presencas
- id: UUID (PK)
- aula_id: UUID (FK → aulas.id)
- aluno_id: UUID (FK → alunos.id)
- presente: BOOLEAN - true = presente, false = faltou
- observacao: VARCHAR(200)

## Relacionamentos importantes:
- turmas.professor_id → usuarios.id (professor da turma)
- matriculas liga alunos ↔ turmas (N:N)
- aulas pertence a turmas
- presencas liga aulas ↔ alunos"#;

/// Current-date context for the model.
fn date_context(today: NaiveDate) -> String {
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let sunday = monday + Duration::days(6);
    format!(
        "Data atual: {} ({})\nSemana atual: de {} a {}",
        today.format("%d/%m/%Y"),
        today.format("%A"),
        monday.format("%d/%m"),
        sunday.format("%d/%m"),
    )
}

/// Full system prompt for one turn.
pub fn system_prompt(today: NaiveDate) -> String {
    format!(
        "Você é o assistente virtual da EduLingua, uma escola de idiomas. Seu papel é \
         ajudar os administradores a consultar informações sobre turmas, alunos, \
         professores, presenças e finanças.\n\n\
         {schema}\n\n\
         ## Instruções:\n\
         1. Sempre use as ferramentas disponíveis para buscar dados atualizados\n\
         2. Responda de forma clara e objetiva em português brasileiro\n\
         3. Formate números, datas e valores de forma legível\n\
         4. Se não encontrar dados, informe claramente\n\
         5. Quando listar muitos itens, organize em formato de lista\n\
         6. Para valores monetários, use R$ e formato brasileiro (1.234,56)\n\
         7. Para datas, use formato DD/MM/YYYY\n\n\
         ## Contexto temporal:\n\
         {date_context}\n\n\
         Seja prestativo, claro e direto nas respostas!",
        schema = DATABASE_SCHEMA,
        date_context = date_context(today),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_schema_and_instructions() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let prompt = system_prompt(today);
        assert!(prompt.contains("### alunos"));
        assert!(prompt.contains("### presencas"));
        assert!(prompt.contains("português brasileiro"));
    }

    #[test]
    fn test_date_context_formats_brazilian_date() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let context = date_context(today);
        assert!(context.contains("06/08/2026"));
    }

    #[test]
    fn test_date_context_week_is_monday_through_sunday() {
        // 2026-08-06 is a Thursday; the week runs 03/08 to 09/08
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let context = date_context(today);
        assert!(context.contains("de 03/08 a 09/08"));
    }
}
