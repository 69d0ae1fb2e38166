use super::*;
use crate::printer::Printer;

#[test]
fn test_void_0() {
    let mut arena = NodeArena::new();
    let node = arena.void_0();
    assert_eq!(Printer::print(&arena, node), "void 0");
}

#[test]
fn test_function_declaration_builder() {
    let mut arena = NodeArena::new();
    let a = arena.id("a");
    let b = arena.id("b");
    let sum = arena.binary(a, "+", b);
    let ret = arena.ret(Some(sum));
    let func = arena.func_decl("add", &["a", "b"], vec![ret]);

    let NodeKind::FunctionDeclaration(data) = arena.kind(func) else {
        panic!("expected function declaration");
    };
    assert_eq!(data.params.len(), 2);
    assert_eq!(arena.parent(data.body), func);
    assert_eq!(
        Printer::print(&arena, func),
        "function add(a, b) {\n    return a + b;\n}"
    );
}

#[test]
fn test_member_builders() {
    let mut arena = NodeArena::new();
    let console = arena.id("console");
    let log = arena.prop(console, "log");
    let arr = arena.id("arr");
    let zero = arena.number(0.0);
    let first = arena.elem(arr, zero);
    let call = arena.call(log, vec![first]);

    assert_eq!(Printer::print(&arena, call), "console.log(arr[0])");
}

#[test]
fn test_switch_builders() {
    let mut arena = NodeArena::new();
    let x = arena.id("x");
    let one = arena.string("1");
    let brk = arena.break_stmt();
    let case = arena.switch_case(Some(one), vec![brk]);
    let switch = arena.switch_stmt(x, vec![case]);

    assert_eq!(arena.parent(case), switch);
    assert_eq!(arena.statements(case), Some(&[brk][..]));
    assert_eq!(
        Printer::print(&arena, switch),
        "switch (x) {\n    case \"1\":\n        break;\n}"
    );
}
