//! Prints the content octets of object identifiers.
//!
//! Provide a sequence of object identifiers in ‘dot integer’ notation and
//! you will receive the octet array for each of them, ready to be pasted
//! into a constant.

use std::env;
use std::process;
use std::str::FromStr;
use bertree::Oid;

fn process_one(arg: &str) -> Result<(), bertree::Error> {
    let oid = Oid::from_str(arg)?;
    let octets = oid.as_slice().iter().map(ToString::to_string)
        .collect::<Vec<_>>();
    println!("{}: [{}]", oid, octets.join(", "));
    Ok(())
}

fn main() {
    let mut failed = false;
    for arg in env::args().skip(1) {
        if let Err(err) = process_one(&arg) {
            eprintln!("{}: {}.", arg, err);
            failed = true;
        }
    }
    if failed {
        process::exit(1)
    }
}
