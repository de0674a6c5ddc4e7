use std::io::{BufRead, Cursor};

use satreduce::{
    algs::{self, PackageSelection},
    instances::{fio::FormatError, PackageInstance},
    solvers::SolveMaxSat,
};

mod common;
use common::{data, BruteForce};

fn parse_and_upgrade<R: BufRead, S: SolveMaxSat>(
    reader: R,
    solver: &mut S,
) -> Result<PackageSelection, algs::Error> {
    let inst = PackageInstance::parse(reader)?;
    algs::upgrade(&inst, solver)
}

fn check_selection(inst: &PackageInstance, sel: &PackageSelection) {
    assert!(inst.is_consistent(&sel.installed));
    assert_eq!(sel.removed.len(), sel.cost);
    assert_eq!(sel.removed.len() + sel.installed.len(), inst.n_packages());
}

#[test]
fn two_conflicting_packages() {
    let inst = PackageInstance::from_path(data("conflict.spu")).unwrap();
    let sel = algs::upgrade(&inst, &mut BruteForce::default()).unwrap();
    assert_eq!(sel.cost, 1);
    assert_eq!(sel.installed.len(), 1);
    check_selection(&inst, &sel);
}

#[test]
fn editors() {
    let inst = PackageInstance::from_path(data("editors.spu")).unwrap();
    assert_eq!(inst.n_packages(), 6);
    let sel = algs::upgrade(&inst, &mut BruteForce::default()).unwrap();
    assert_eq!(sel.cost, 2);
    check_selection(&inst, &sel);
    let libtinfo = inst.package("libtinfo").unwrap().to_ipasir();
    assert!(sel.removed.contains(&libtinfo));
    let vim = inst.package("vim").unwrap().to_ipasir();
    let emacs = inst.package("emacs").unwrap().to_ipasir();
    assert!(sel.removed.contains(&vim) != sel.removed.contains(&emacs));
}

#[test]
fn unsatisfiable_dependency() {
    // `a` requires nothing that exists, so it can never be installed
    let sel = parse_and_upgrade(
        Cursor::new("p 3\nn a\nn b\nn c\nd a\nd b c\n"),
        &mut BruteForce::default(),
    )
    .unwrap();
    assert_eq!(sel.cost, 1);
    assert_eq!(sel.removed, vec![1]);
    assert_eq!(sel.installed, vec![2, 3]);
}

#[test]
fn no_constraints_installs_everything() {
    let sel = parse_and_upgrade(Cursor::new("p 2\na\nb\n"), &mut BruteForce::default()).unwrap();
    assert_eq!(sel.cost, 0);
    assert!(sel.removed.is_empty());
    assert_eq!(sel.installed, vec![1, 2]);
}

#[test]
fn format_errors_abort() {
    assert!(matches!(
        parse_and_upgrade(
            Cursor::new("p 2\nn a\nn b\nc a x\n"),
            &mut BruteForce::default()
        ),
        Err(algs::Error::Format(FormatError::UnknownPackage { line: 4, .. }))
    ));
    assert!(matches!(
        parse_and_upgrade(Cursor::new("n a\n"), &mut BruteForce::default()),
        Err(algs::Error::Format(FormatError::MissingHeader { .. }))
    ));
}

#[test]
fn dependency_chain() {
    // a -> b -> c, c conflicts with d
    let sel = parse_and_upgrade(
        Cursor::new("p 4\nn a\nn b\nn c\nn d\nd a b\nd b c\nc c d\n"),
        &mut BruteForce::default(),
    )
    .unwrap();
    assert_eq!(sel.cost, 1);
    assert_eq!(sel.removed, vec![4]);
}
