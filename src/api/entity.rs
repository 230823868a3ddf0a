use clap::ValueEnum;
use serde_json::Value;

use crate::time::format_date;

/// The record kinds managed through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    #[value(alias = "students", alias = "aluno")]
    Student,

    #[value(alias = "professors")]
    Professor,

    #[value(alias = "subjects", alias = "disciplina")]
    Subject,

    #[value(alias = "sections", alias = "turma")]
    Section,

    #[value(alias = "grades", alias = "nota")]
    Grade,

    #[value(alias = "enrollments", alias = "turmaaluno")]
    Enrollment,
}

/// How a cell value is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Plain,
    /// `12345678901` -> `123.456.789-01`
    Cpf,
    /// Workload in hours, `60` -> `60h`
    Hours,
    /// First 50 characters followed by `...`
    Excerpt,
    /// ISO date -> `dd/mm/yyyy`
    Date,
    Flag,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub key: &'static str,

    /// Dotted path into the record, `turma.disciplina.nome`.
    pub field: &'static str,

    pub format: Format,

    /// Shown when the field is missing, null or empty.
    pub fallback: &'static str,
}

const NA: &str = "N/A";
const EXCERPT_CHARS: usize = 50;

const fn column(title: &'static str, key: &'static str, field: &'static str) -> Column {
    Column {
        title,
        key,
        field,
        format: Format::Plain,
        fallback: NA,
    }
}

const fn formatted(
    title: &'static str,
    key: &'static str,
    field: &'static str,
    format: Format,
    fallback: &'static str,
) -> Column {
    Column {
        title,
        key,
        field,
        format,
        fallback,
    }
}

const ID: Column = column("ID", "id", "id");

const STUDENT_COLUMNS: &[Column] = &[
    ID,
    column("Name", "name", "nome"),
    formatted("CPF", "cpf", "cpf", Format::Cpf, NA),
];

const PROFESSOR_COLUMNS: &[Column] = &[
    ID,
    column("Name", "name", "nome"),
    column("Email", "email", "email"),
    formatted("Phone", "phone", "telefone", Format::Plain, "not provided"),
];

const SUBJECT_COLUMNS: &[Column] = &[
    ID,
    column("Name", "name", "nome"),
    formatted("Workload", "workload", "cargaHoraria", Format::Hours, NA),
    formatted("Syllabus", "syllabus", "ementa", Format::Excerpt, "not provided"),
];

const SECTION_COLUMNS: &[Column] = &[
    ID,
    column("Subject", "subject", "disciplina.nome"),
    column("Professor", "professor", "professor.nome"),
    column("Year", "year", "ano"),
    column("Term", "term", "periodo"),
];

const GRADE_COLUMNS: &[Column] = &[
    ID,
    column("Student", "student", "aluno.nome"),
    column("Section", "section", "turma.disciplina.nome"),
    column("Value", "value", "valor"),
    formatted("Note", "note", "observacao", Format::Plain, "no note"),
];

const ENROLLMENT_COLUMNS: &[Column] = &[
    ID,
    column("Student", "student", "aluno.nome"),
    column("Section", "section", "turma.disciplina.nome"),
    formatted("Enrolled", "enrolled", "dataIngresso", Format::Date, NA),
    formatted("Active", "active", "ativo", Format::Flag, NA),
];

impl Entity {
    pub const ALL: [Entity; 6] = [
        Entity::Student,
        Entity::Professor,
        Entity::Subject,
        Entity::Section,
        Entity::Grade,
        Entity::Enrollment,
    ];

    /// Collection path of the entity on the server.
    pub fn path(self) -> &'static str {
        match self {
            Entity::Student => "/aluno",
            Entity::Professor => "/professor",
            Entity::Subject => "/disciplina",
            Entity::Section => "/turma",
            Entity::Grade => "/nota",
            Entity::Enrollment => "/turmaaluno",
        }
    }

    pub fn record_path(self, id: u64) -> String {
        format!("{}/{id}", self.path())
    }

    pub fn title(self) -> &'static str {
        match self {
            Entity::Student => "Students",
            Entity::Professor => "Professors",
            Entity::Subject => "Subjects",
            Entity::Section => "Sections",
            Entity::Grade => "Grades",
            Entity::Enrollment => "Enrollments",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Entity::Student => "Student",
            Entity::Professor => "Professor",
            Entity::Subject => "Subject",
            Entity::Section => "Section",
            Entity::Grade => "Grade",
            Entity::Enrollment => "Enrollment",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            Entity::Student => STUDENT_COLUMNS,
            Entity::Professor => PROFESSOR_COLUMNS,
            Entity::Subject => SUBJECT_COLUMNS,
            Entity::Section => SECTION_COLUMNS,
            Entity::Grade => GRADE_COLUMNS,
            Entity::Enrollment => ENROLLMENT_COLUMNS,
        }
    }

    pub fn table_titles(self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.title).collect()
    }

    pub fn table_row(self, record: &Value) -> Vec<String> {
        self.columns().iter().map(|c| c.render(record)).collect()
    }
}

impl Column {
    pub fn render(&self, record: &Value) -> String {
        let value = lookup(record, self.field);
        if self.format == Format::Flag {
            return match value {
                Some(Value::Bool(true)) => String::from("✅"),
                _ => String::from("❌"),
            };
        }

        let text = match value.and_then(value_text) {
            Some(text) => text,
            None => return self.fallback.to_string(),
        };

        match self.format {
            Format::Plain | Format::Flag => text,
            Format::Cpf => format_cpf(&text),
            Format::Hours => format!("{text}h"),
            Format::Excerpt => excerpt(&text),
            Format::Date => format_date(&text),
        }
    }
}

fn lookup<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    let mut current = record;
    for name in field.split('.') {
        current = current.get(name)?;
    }
    Some(current)
}

/// Text of a scalar json value, `None` for values that read as absent.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

pub fn format_cpf(cpf: &str) -> String {
    if cpf.len() != 11 || !cpf.bytes().all(|b| b.is_ascii_digit()) {
        return cpf.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &cpf[0..3],
        &cpf[3..6],
        &cpf[6..9],
        &cpf[9..11]
    )
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{head}...")
}

/// Reads the numeric `id` of a record.
pub fn record_id(record: &Value) -> Option<u64> {
    match record.get("id")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
