//! # Parsing Package Upgrade Instances
//!
//! ```text
//! p spu <packages>
//! n <name>
//! d <dependent> <requirement>...
//! c <package> <package>
//! ```
//!
//! Package lines come first, then dependency lines, then conflict lines.
//! Package lines may also be given as a bare name.

use std::io::BufRead;

use nom::{
    bytes::complete::tag,
    character::complete::{digit1, space0, space1},
    combinator::{all_consuming, map_res, opt},
    sequence::{terminated, tuple},
    IResult,
};

use crate::{
    instances::{Conflict, Dependency, PackageInstance},
    types::Var,
};

use super::{FormatError, LineReader};

/// Parses a package upgrade instance
///
/// # Errors
///
/// If the header is missing or malformed, a line has an unexpected marker,
/// a package is declared twice or an undeclared package is referenced.
pub fn parse_instance<R: BufRead>(reader: R) -> Result<PackageInstance, FormatError> {
    let mut lines = LineReader::new(reader);
    let Some((line_num, line)) = lines.next_line()? else {
        return Err(FormatError::MissingHeader {
            line: lines.next_line_num(),
        });
    };
    if !line.starts_with('p') {
        return Err(FormatError::MissingHeader { line: line_num });
    }
    let (_, n_packages) = all_consuming(p_line)(line).map_err(|_| FormatError::InvalidHeader {
        line: line_num,
        content: line.to_string(),
    })?;

    let mut inst = PackageInstance::new();
    while inst.n_packages() < n_packages {
        let Some((line_num, line)) = lines.next_line()? else {
            tracing::warn!(
                "expected {n_packages} packages but input ended after {}",
                inst.n_packages()
            );
            return Ok(inst);
        };
        let name = match line.split_whitespace().collect::<Vec<_>>()[..] {
            ["n", name] => name,
            [name] if name != "n" => name,
            _ => {
                return Err(FormatError::InvalidLine {
                    line: line_num,
                    content: line.to_string(),
                    reason: "expected `n <name>`",
                })
            }
        };
        if inst.add_package(name).is_err() {
            return Err(FormatError::DuplicatePackage {
                line: line_num,
                name: name.to_string(),
            });
        }
    }

    let mut in_conflicts = false;
    while let Some((line_num, line)) = lines.next_line()? {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[..] {
            ["d", ref names @ ..] if !in_conflicts => {
                let Some((dependent, requirements)) = names.split_first() else {
                    return Err(FormatError::InvalidLine {
                        line: line_num,
                        content: line.to_string(),
                        reason: "dependency without packages",
                    });
                };
                let dependent = resolve(&inst, dependent, line_num)?;
                let requirements = requirements
                    .iter()
                    .map(|name| resolve(&inst, name, line_num))
                    .collect::<Result<Vec<_>, _>>()?;
                inst.add_dependency(Dependency {
                    dependent,
                    requirements,
                });
            }
            ["c", ..] => {
                in_conflicts = true;
                let &["c", a, b] = tokens.as_slice() else {
                    return Err(FormatError::InvalidLine {
                        line: line_num,
                        content: line.to_string(),
                        reason: "a conflict needs exactly two packages",
                    });
                };
                let conflict = Conflict(resolve(&inst, a, line_num)?, resolve(&inst, b, line_num)?);
                inst.add_conflict(conflict);
            }
            _ => {
                return Err(FormatError::UnexpectedLine {
                    line: line_num,
                    content: line.to_string(),
                    expected: if in_conflicts {
                        "a `c` conflict line"
                    } else {
                        "a `d` dependency or `c` conflict line"
                    },
                })
            }
        }
    }
    tracing::debug!(
        packages = inst.n_packages(),
        dependencies = inst.dependencies().len(),
        conflicts = inst.conflicts().len(),
        "parsed package instance"
    );
    Ok(inst)
}

fn resolve(inst: &PackageInstance, name: &str, line: usize) -> Result<Var, FormatError> {
    inst.package(name).ok_or_else(|| FormatError::UnknownPackage {
        line,
        name: name.to_string(),
    })
}

/// Parses `p <packages>` or `p spu <packages>`
fn p_line(input: &str) -> IResult<&str, usize> {
    let (input, (_, _, _, n_packages, _)) = tuple((
        tag("p"),
        space1,
        opt(terminated(tag("spu"), space1)),
        map_res(digit1, str::parse::<usize>),
        space0,
    ))(input)?;
    Ok((input, n_packages))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{p_line, parse_instance};
    use crate::instances::{fio::FormatError, Conflict};

    #[test]
    fn p_line_pass() {
        assert_eq!(p_line("p 3"), Ok(("", 3)));
        assert_eq!(p_line("p spu 12 "), Ok(("", 12)));
        assert!(p_line("p spu").is_err());
        assert!(p_line("p cnf 3").is_err());
    }

    #[test]
    fn parse_full() {
        let data = "p spu 4\nn a\nn b\nc\n\nd\nd a b c\nd b d\nc a d\nc c d\n";
        let inst = parse_instance(Cursor::new(data)).unwrap();
        assert_eq!(inst.n_packages(), 4);
        assert_eq!(inst.name(3), Some("c"));
        assert_eq!(inst.name(4), Some("d"));
        assert_eq!(inst.dependencies().len(), 2);
        let a = inst.package("a").unwrap();
        let b = inst.package("b").unwrap();
        let c = inst.package("c").unwrap();
        assert_eq!(inst.dependencies()[0].dependent, a);
        assert_eq!(inst.dependencies()[0].requirements, vec![b, c]);
        assert_eq!(inst.conflicts()[0], Conflict(a, inst.package("d").unwrap()));
        assert_eq!(inst.conflicts().len(), 2);
    }

    #[test]
    fn short_package_list() {
        let inst = parse_instance(Cursor::new("p 3\nn a\n")).unwrap();
        assert_eq!(inst.n_packages(), 1);
        let inst = parse_instance(Cursor::new("p 0\n")).unwrap();
        assert_eq!(inst.n_packages(), 0);
    }

    #[test]
    fn header_errors() {
        assert!(matches!(
            parse_instance(Cursor::new("")),
            Err(FormatError::MissingHeader { line: 1 })
        ));
        assert!(matches!(
            parse_instance(Cursor::new("n a\n")),
            Err(FormatError::MissingHeader { line: 1 })
        ));
        assert!(matches!(
            parse_instance(Cursor::new("p many\n")),
            Err(FormatError::InvalidHeader { line: 1, .. })
        ));
    }

    #[test]
    fn unknown_and_duplicate_packages() {
        assert!(matches!(
            parse_instance(Cursor::new("p 2\nn a\nn b\nd a z\n")),
            Err(FormatError::UnknownPackage { line: 4, ref name }) if name == "z"
        ));
        assert!(matches!(
            parse_instance(Cursor::new("p 2\nn a\nn a\n")),
            Err(FormatError::DuplicatePackage { line: 3, .. })
        ));
    }

    #[test]
    fn section_order() {
        assert!(matches!(
            parse_instance(Cursor::new("p 2\nn a\nn b\nc a b\nd a b\n")),
            Err(FormatError::UnexpectedLine { line: 5, .. })
        ));
        assert!(matches!(
            parse_instance(Cursor::new("p 2\nn a\nn b\nx a b\n")),
            Err(FormatError::UnexpectedLine { line: 4, .. })
        ));
        assert!(matches!(
            parse_instance(Cursor::new("p 2\nn a\nn b\nc a\n")),
            Err(FormatError::InvalidLine { line: 4, .. })
        ));
        assert!(matches!(
            parse_instance(Cursor::new("p 2\nn a b\n")),
            Err(FormatError::InvalidLine { line: 2, .. })
        ));
    }
}
