use lts::aut::parse_aut;
use lts::IdAlloc;

fn main() {
    let left_path = std::env::args().nth(1).expect("No first aut file provided");
    let right_path = std::env::args().nth(2).expect("No second aut file provided");

    let left_file = std::fs::read_to_string(left_path).expect("Failed to read first aut file");
    let right_file = std::fs::read_to_string(right_path).expect("Failed to read second aut file");

    let now = std::time::Instant::now();

    let mut alloc = IdAlloc::new();
    let left = parse_aut(&mut alloc, &left_file).expect("Failed to parse first aut file");
    let right = parse_aut(&mut alloc, &right_file).expect("Failed to parse second aut file");

    println!("Parsing took {:?}", now.elapsed());

    let now = std::time::Instant::now();
    let equivalent = bisim::equivalent(&[&left, &right]);

    println!("Check took {:?}", now.elapsed());
    println!("The two systems {} strongly bisimilar", if equivalent { "are" } else { "are not" });
}
