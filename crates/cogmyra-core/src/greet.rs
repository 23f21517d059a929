/// Friendly greeting for `name`.
pub fn greet(name: &str) -> String {
    format!("Hello, {name}!")
}

#[cfg(test)]
mod tests {
    use super::greet;
    use pretty_assertions::assert_eq;

    #[test]
    fn greets_by_name() {
        assert_eq!(greet("World"), "Hello, World!");
        assert_eq!(greet(""), "Hello, !");
    }
}
