//! Console walkthrough of eager and lazy transforms.
//!
//! Run with `cargo run -p traph --example smoke`.
use std::time::Instant;

use traph::prelude::*;

fn main() -> TraphResult<()> {
    let transform = compile_transform(
        Rules::<Record>::new()
            .rule("full", |i, _| Ok(format!("{}{}", i.get("first")?, i.get("last")?).into()))
            .rule("formal", |i, o| {
                Ok(format!("{}, born {}", o.get("full")?, i.get("birth")?).into())
            }),
    )?;

    let c_input = record! { "first" => "caesar", "last" => "sol", "birth" => "1988-08-24" };
    let c = transform.apply(&c_input)?;
    println!("{c:?}");
    println!("{:?}", c.keys().collect::<Vec<_>>());

    let d_input = record! { "first" => "puci", "last" => "na", "birth" => "1985-10-12" };
    let d = transform.lazy(&d_input);
    println!("{d:?}");
    println!("{:?}", d.keys().collect::<Vec<_>>());

    println!("first call (will execute rules)");
    let start = Instant::now();
    println!("{}", d.get("formal")?);
    println!("1: {:?}", start.elapsed());

    println!("subsequent calls (will use cached)");
    for n in 2..=4 {
        let start = Instant::now();
        println!("{}", d.get("formal")?);
        println!("{}: {:?}", n, start.elapsed());
    }

    Ok(())
}
