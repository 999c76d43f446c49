//! `locbridge keys` - list recognized option keys.

use locbridge::options::option_fields;

/// Print the option table.
pub fn run() {
    println!("Recognized Options");
    println!("==================");
    println!();

    for field in option_fields() {
        println!("  {:<20} {:<8} default: {}", field.key, field.kind(), field.default);
        if !field.literals.is_empty() {
            println!("  {:<20} {:<8} values:  {}", "", "", field.literals.join(", "));
        }
    }

    println!();
    println!("Unrecognized keys and mistyped values are ignored.");
}
