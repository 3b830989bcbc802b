use euclidean_vector::{dot, norm, unit, Vector};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Euclidean Vector Demo");
    println!("=====================\n");

    let mut a = Vector::from([3.0, 4.0, 0.0]);
    let b = Vector::filled(3, 1.5);
    println!("a = {a}");
    println!("b = {b}");

    println!("\nArithmetic");
    println!("  a + b   = {}", &a + &b);
    println!("  a - b   = {}", &a - &b);
    println!("  -a      = {}", -&a);
    println!("  2 * a   = {}", 2.0 * &a);
    println!("  a / 4   = {:.2}", a.try_div(4.0)?);

    println!("\nNorm, unit and dot");
    println!("  |a|     = {}", norm(&a)?);
    println!("  unit(a) = {}", unit(&a)?);
    println!("  a . b   = {}", dot(&a, &b)?);

    a[2] = 12.0;
    println!("  after a[2] = 12: |a| = {}", norm(&a)?);

    println!("\nRejected operations");
    if let Err(err) = a.try_add(&Vector::zeros(2)) {
        println!("  {err}");
    }
    if let Err(err) = a.try_div(0.0) {
        println!("  {err}");
    }
    if let Err(err) = a.at(10) {
        println!("  {err}");
    }
    if let Err(err) = unit(&Vector::zeros(3)) {
        println!("  {err}");
    }

    let moved = a.take();
    println!("\nAfter take: moved = {moved}, source = {a}");

    Ok(())
}
