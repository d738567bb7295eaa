/// Collapses whitespace and rewrites `?` placeholders to Postgres `$n` form.
///
/// Lets queries be written in the positional style and keeps logged SQL on
/// one line.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut result = String::with_capacity(cleaned.len() + 8);
    let mut param_index = 1;
    for c in cleaned.chars() {
        if c == '?' {
            result.push('$');
            result.push_str(&param_index.to_string());
            param_index += 1;
        } else {
            result.push(c);
        }
    }
    result
}
