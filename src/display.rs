use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

use crate::api::entity::Entity;
use crate::table::Table;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DisplayStyle {
    Table,
    Json,
    Csv,
}

pub fn pretty_json<T: Serialize>(o: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&o)?);
    Ok(())
}

pub fn display_records(
    entity: Entity,
    records: &[Value],
    style: DisplayStyle,
    headless: bool,
) -> Result<()> {
    print!("{}", render_records(entity, records, style, headless)?);
    Ok(())
}

pub fn render_records(
    entity: Entity,
    records: &[Value],
    style: DisplayStyle,
    headless: bool,
) -> Result<String> {
    let out = match style {
        DisplayStyle::Table => {
            let mut out = if headless {
                String::new()
            } else {
                format!("{}\n", entity.title())
            };
            if records.is_empty() {
                out.push_str("<empty list>\n");
            } else {
                let mut table = Table::with_capacity(records.len() + 1, headless);
                table.add(entity.table_titles().iter().map(|s| s.to_string()).collect());
                for record in records {
                    table.add(entity.table_row(record));
                }
                out.push_str(&table.render());
            }
            if !headless {
                out.push_str(&format_count(records.len()));
                out.push('\n');
            }
            out
        }
        DisplayStyle::Csv => {
            let mut out = String::new();
            if !headless {
                let keys: Vec<_> = entity.columns().iter().map(|c| c.key).collect();
                out.push_str(&keys.join(","));
                out.push('\n');
            }
            for record in records {
                let cells: Vec<_> = entity
                    .table_row(record)
                    .into_iter()
                    .map(|cell| csv_cell(&cell))
                    .collect();
                out.push_str(&cells.join(","));
                out.push('\n');
            }
            out
        }
        DisplayStyle::Json => {
            let json = serde_json::to_string_pretty(records)?;
            format!("{json}\n")
        }
    };
    Ok(out)
}

pub fn format_count(count: usize) -> String {
    if count == 1 {
        String::from("1 record")
    } else {
        format!("{count} records")
    }
}

fn csv_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn students() -> Vec<Value> {
        vec![
            json!({"id": 1, "nome": "Ana", "cpf": "12345678901"}),
            json!({"id": 2, "nome": "Silva, Bia", "cpf": "98765432100"}),
        ]
    }

    #[test]
    fn test_render_table() {
        let out = render_records(Entity::Student, &students(), DisplayStyle::Table, false).unwrap();
        let expect = "\
Students
+----+------------+----------------+
| ID | Name       | CPF            |
+----+------------+----------------+
| 1  | Ana        | 123.456.789-01 |
| 2  | Silva, Bia | 987.654.321-00 |
+----+------------+----------------+
2 records
";
        assert_eq!(out, expect);
    }

    #[test]
    fn test_render_empty_table() {
        let out = render_records(Entity::Grade, &[], DisplayStyle::Table, false).unwrap();
        assert_eq!(out, "Grades\n<empty list>\n0 records\n");
    }

    #[test]
    fn test_render_csv() {
        let out = render_records(Entity::Student, &students(), DisplayStyle::Csv, false).unwrap();
        assert_eq!(
            out,
            "id,name,cpf\n1,Ana,123.456.789-01\n2,\"Silva, Bia\",987.654.321-00\n"
        );

        let out = render_records(Entity::Student, &students(), DisplayStyle::Csv, true).unwrap();
        assert!(out.starts_with("1,Ana"));
    }

    #[test]
    fn test_render_json() {
        let out = render_records(Entity::Student, &students(), DisplayStyle::Json, false).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, students());
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0 records");
        assert_eq!(format_count(1), "1 record");
        assert_eq!(format_count(7), "7 records");
    }
}
