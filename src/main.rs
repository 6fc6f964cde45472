use std::io::Read;

use anyhow::{Context, Result};
use arbor::{
    compiler::compile, init_tracing, interpreter::Interpreter, machine::Machine, parser::parse_source,
};

fn print_values(values: &[i32]) {
    for value in values {
        println!("{}", value);
    }
}

fn main() -> Result<()> {
    init_tracing();

    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .context("reading program from stdin")?;

    let program = parse_source(&source)?;
    println!("== infix ==");
    print!("{}", program);

    println!("== interpreting ==");
    let mut interpreter = Interpreter::new();
    let result = interpreter.run(&program);
    print_values(interpreter.output());
    result?;
    println!("== interpreter bindings ==");
    print!("{}", interpreter.bindings());

    let code = compile(&program);
    let mut machine = Machine::new();
    machine.assemble(&code)?;
    println!("== machine instructions ==");
    print!("{}", machine.listing());

    println!("== executing ==");
    let result = machine.execute();
    print_values(machine.output());
    result?;
    println!("== machine bindings ==");
    print!("{}", machine.bindings());
    println!("== machine stack ==");
    print!("{}", machine.stack());
    Ok(())
}
