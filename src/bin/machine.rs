// Runs hand-written instruction text on its own, without going through the tree builder.

use std::io::Read;

use anyhow::{Context, Result};
use arbor::{init_tracing, machine::Machine};

fn main() -> Result<()> {
    init_tracing();

    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .context("reading instructions from stdin")?;

    let mut machine = Machine::new();
    machine.assemble(source.lines())?;
    println!("== machine instructions ==");
    print!("{}", machine.listing());

    println!("== executing ==");
    let result = machine.execute();
    for value in machine.output() {
        println!("{}", value);
    }
    result?;
    println!("== machine bindings ==");
    print!("{}", machine.bindings());
    println!("== machine stack ==");
    print!("{}", machine.stack());
    Ok(())
}
