use metaform_core::{AppError, AppResult};

const USAGE: &str =
    "usage: metaform-console [list | create field=value... | update <id> field=value... | delete <id> --yes]";

/// One `field=value` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub field: String,
    pub raw_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    List,
    Create {
        assignments: Vec<FieldAssignment>,
    },
    Update {
        id: String,
        assignments: Vec<FieldAssignment>,
    },
    Delete {
        id: String,
        confirmed: bool,
    },
}

impl ConsoleCommand {
    /// Parses the arguments following the program name.
    pub fn parse<I>(arguments: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut arguments = arguments.into_iter();
        let Some(command) = arguments.next() else {
            return Ok(Self::List);
        };

        match command.as_str() {
            "list" => {
                if arguments.next().is_some() {
                    return Err(usage_error());
                }
                Ok(Self::List)
            }
            "create" => Ok(Self::Create {
                assignments: parse_assignments(arguments)?,
            }),
            "update" => {
                let id = required_id(arguments.next())?;
                Ok(Self::Update {
                    id,
                    assignments: parse_assignments(arguments)?,
                })
            }
            "delete" => {
                let id = required_id(arguments.next())?;
                let confirmed = match arguments.next().as_deref() {
                    None => false,
                    Some("--yes") => true,
                    Some(_) => return Err(usage_error()),
                };
                if arguments.next().is_some() {
                    return Err(usage_error());
                }
                Ok(Self::Delete { id, confirmed })
            }
            _ => Err(usage_error()),
        }
    }
}

fn parse_assignments<I>(arguments: I) -> AppResult<Vec<FieldAssignment>>
where
    I: Iterator<Item = String>,
{
    arguments
        .map(|argument| {
            let Some((field, raw_value)) = argument.split_once('=') else {
                return Err(AppError::Validation(format!(
                    "expected field=value, got '{argument}'"
                )));
            };
            if field.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "missing field name in '{argument}'"
                )));
            }

            Ok(FieldAssignment {
                field: field.trim().to_owned(),
                raw_value: raw_value.to_owned(),
            })
        })
        .collect()
}

fn required_id(argument: Option<String>) -> AppResult<String> {
    argument
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty() && !id.starts_with("--"))
        .ok_or_else(usage_error)
}

fn usage_error() -> AppError {
    AppError::Validation(USAGE.to_owned())
}

#[cfg(test)]
mod tests {
    use metaform_core::AppError;

    use super::{ConsoleCommand, FieldAssignment};

    fn parse(arguments: &[&str]) -> Result<ConsoleCommand, AppError> {
        ConsoleCommand::parse(arguments.iter().map(|argument| (*argument).to_owned()))
    }

    fn assignment(field: &str, raw_value: &str) -> FieldAssignment {
        FieldAssignment {
            field: field.to_owned(),
            raw_value: raw_value.to_owned(),
        }
    }

    #[test]
    fn no_arguments_lists() {
        assert_eq!(parse(&[]), Ok(ConsoleCommand::List));
        assert_eq!(parse(&["list"]), Ok(ConsoleCommand::List));
    }

    #[test]
    fn create_and_update_collect_assignments() {
        assert_eq!(
            parse(&["create", "firstName=Ada", "note=a=b", "phone="]),
            Ok(ConsoleCommand::Create {
                assignments: vec![
                    assignment("firstName", "Ada"),
                    assignment("note", "a=b"),
                    assignment("phone", ""),
                ],
            })
        );
        assert_eq!(
            parse(&["update", "7", "lastName=Byron"]),
            Ok(ConsoleCommand::Update {
                id: "7".to_owned(),
                assignments: vec![assignment("lastName", "Byron")],
            })
        );
    }

    #[test]
    fn delete_requires_explicit_confirmation_flag() {
        assert_eq!(
            parse(&["delete", "3"]),
            Ok(ConsoleCommand::Delete {
                id: "3".to_owned(),
                confirmed: false,
            })
        );
        assert_eq!(
            parse(&["delete", "3", "--yes"]),
            Ok(ConsoleCommand::Delete {
                id: "3".to_owned(),
                confirmed: true,
            })
        );
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        for arguments in [
            &["drop"][..],
            &["create", "firstName"],
            &["create", "=Ada"],
            &["update"],
            &["delete", "--yes"],
            &["delete", "3", "--force"],
        ] {
            assert!(matches!(parse(arguments), Err(AppError::Validation(_))));
        }
    }
}
