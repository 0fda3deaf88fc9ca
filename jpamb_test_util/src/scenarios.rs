//! Hand-authored opcode sequences for the six end-to-end scenarios used
//! across the workspace's test suites.
use crate::FixtureSuite;
use jpamb_opcode::{BinaryOp, Condition, Literal, MethodId, Opcode, ParamDescriptor, Type};
use std::collections::BTreeSet;

fn method(name: &str, params: Vec<Type>, return_type: Option<Type>) -> MethodId {
    MethodId {
        class_name: "Fixtures".to_string(),
        method_name: name.to_string(),
        params,
        return_type,
    }
}

fn assertion_error_ctor() -> MethodId {
    MethodId {
        class_name: "java/lang/AssertionError".to_string(),
        method_name: "<init>".to_string(),
        params: vec![],
        return_type: None,
    }
}

/// `int f(int n) { return 10/n; }`
#[must_use]
pub fn div_by_param() -> (FixtureSuite, MethodId) {
    let m = method("divByParam", vec![Type::Int], Some(Type::Int));
    let opcodes = vec![
        Opcode::Push(Literal::Int(10)),
        Opcode::Load {
            ty: Type::Int,
            index: 0,
        },
        Opcode::Binary {
            ty: Type::Int,
            op: BinaryOp::Div,
        },
        Opcode::Return { ty: Some(Type::Int) },
    ];
    let suite = FixtureSuite::new()
        .with_method(m.clone(), opcodes)
        .with_constants(
            m.clone(),
            BTreeSet::from([10]),
            vec![ParamDescriptor::new("n", "int")],
        );
    (suite, m)
}

/// `void g(int n) { assert n > 0; }`
#[must_use]
pub fn assert_positive() -> (FixtureSuite, MethodId) {
    let m = method("assertPositive", vec![Type::Int], None);
    let opcodes = vec![
        Opcode::Get {
            field: "$assertionsDisabled".to_string(),
            is_static: true,
        },
        Opcode::Ifz {
            cond: Condition::Ne,
            target: 8,
        },
        Opcode::Load {
            ty: Type::Int,
            index: 0,
        },
        Opcode::Ifz {
            cond: Condition::Gt,
            target: 8,
        },
        Opcode::New {
            class_name: "java/lang/AssertionError".to_string(),
        },
        Opcode::Dup { words: 1 },
        Opcode::InvokeSpecial {
            callee: assertion_error_ctor(),
        },
        Opcode::Throw,
        Opcode::Return { ty: None },
    ];
    let suite = FixtureSuite::new()
        .with_method(m.clone(), opcodes)
        .with_constants(m.clone(), BTreeSet::new(), vec![ParamDescriptor::new("n", "int")]);
    (suite, m)
}

/// `void h() { while (true) {} }`
#[must_use]
pub fn infinite_loop() -> (FixtureSuite, MethodId) {
    let m = method("infiniteLoop", vec![], None);
    let opcodes = vec![Opcode::Goto { target: 0 }];
    let suite = FixtureSuite::new()
        .with_method(m.clone(), opcodes)
        .with_constants(m.clone(), BTreeSet::new(), vec![]);
    (suite, m)
}

/// `int k() { int[] a = new int[3]; return a[5]; }`
#[must_use]
pub fn array_oob() -> (FixtureSuite, MethodId) {
    let m = method("arrayOOB", vec![], Some(Type::Int));
    let opcodes = vec![
        Opcode::Push(Literal::Int(3)),
        Opcode::NewArray {
            elem_ty: Type::Int,
            dim: 1,
        },
        Opcode::Store {
            ty: Type::Reference,
            index: 0,
        },
        Opcode::Load {
            ty: Type::Reference,
            index: 0,
        },
        Opcode::Push(Literal::Int(5)),
        Opcode::ArrayLoad { ty: Type::Int },
        Opcode::Return { ty: Some(Type::Int) },
    ];
    let suite = FixtureSuite::new()
        .with_method(m.clone(), opcodes)
        .with_constants(m.clone(), BTreeSet::from([3, 5]), vec![]);
    (suite, m)
}

/// `int fib(int n) { return n < 2 ? n : fib(n-1) + fib(n-2); }`
#[must_use]
pub fn recursive_fib() -> (FixtureSuite, MethodId) {
    let m = method("fib", vec![Type::Int], Some(Type::Int));
    let opcodes = vec![
        Opcode::Load { ty: Type::Int, index: 0 }, // 0
        Opcode::Push(Literal::Int(2)),            // 1
        Opcode::If {
            cond: Condition::Lt,
            target: 13,
        }, // 2
        Opcode::Load { ty: Type::Int, index: 0 }, // 3
        Opcode::Push(Literal::Int(1)),            // 4
        Opcode::Binary {
            ty: Type::Int,
            op: BinaryOp::Sub,
        }, // 5
        Opcode::InvokeStatic { callee: m.clone() }, // 6
        Opcode::Load { ty: Type::Int, index: 0 }, // 7
        Opcode::Push(Literal::Int(2)),            // 8
        Opcode::Binary {
            ty: Type::Int,
            op: BinaryOp::Sub,
        }, // 9
        Opcode::InvokeStatic { callee: m.clone() }, // 10
        Opcode::Binary {
            ty: Type::Int,
            op: BinaryOp::Add,
        }, // 11
        Opcode::Return { ty: Some(Type::Int) }, // 12
        Opcode::Load { ty: Type::Int, index: 0 }, // 13
        Opcode::Return { ty: Some(Type::Int) }, // 14
    ];
    let suite = FixtureSuite::new()
        .with_method(m.clone(), opcodes)
        .with_constants(
            m.clone(),
            BTreeSet::from([1, 2]),
            vec![ParamDescriptor::new("n", "int")],
        );
    (suite, m)
}

/// `int sum(int n) { int s=0; for (int i=0;i<n;i++) s+=i; return s; }`
#[must_use]
pub fn loop_with_back_edge() -> (FixtureSuite, MethodId) {
    let m = method("sum", vec![Type::Int], Some(Type::Int));
    let opcodes = vec![
        Opcode::Push(Literal::Int(0)), // 0
        Opcode::Store { ty: Type::Int, index: 1 }, // 1  s = 0
        Opcode::Push(Literal::Int(0)), // 2
        Opcode::Store { ty: Type::Int, index: 2 }, // 3  i = 0
        Opcode::Load { ty: Type::Int, index: 1 }, // 4  s      <- back-edge lands here, mid-entry-block
        Opcode::Load { ty: Type::Int, index: 2 }, // 5  i
        Opcode::Binary {
            ty: Type::Int,
            op: BinaryOp::Add,
        }, // 6
        Opcode::Store { ty: Type::Int, index: 1 }, // 7  s = s + i
        Opcode::Incr { index: 2, amount: 1 }, // 8  i++
        Opcode::Load { ty: Type::Int, index: 2 }, // 9  i
        Opcode::Load { ty: Type::Int, index: 0 }, // 10 n
        Opcode::If {
            cond: Condition::Lt,
            target: 4,
        }, // 11 if i < n goto 4
        Opcode::Load { ty: Type::Int, index: 1 }, // 12 s
        Opcode::Return { ty: Some(Type::Int) }, // 13
    ];
    let suite = FixtureSuite::new()
        .with_method(m.clone(), opcodes)
        .with_constants(m.clone(), BTreeSet::new(), vec![ParamDescriptor::new("n", "int")]);
    (suite, m)
}
