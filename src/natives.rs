//! Host procedures installed into the global environment.

use chrono::Utc;

use crate::callable::NativeFunction;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Faces `emoticon()` picks from.
pub const EMOTICONS: [&str; 6] = [":3", "c:", "^^", "UwU", "OwO", "^~^"];

/// The default set: `clock`, `typeof`, `uwuify` and `emoticon`.
pub fn standard() -> Vec<NativeFunction> {
    vec![
        NativeFunction::new("clock", 0, clock),
        NativeFunction::new("typeof", 1, type_of),
        NativeFunction::new("uwuify", 1, uwuify),
        NativeFunction::new("emoticon", 0, emoticon),
    ]
}

/// Seconds since the Unix epoch, with millisecond resolution.
fn clock(_: &mut Interpreter, _: &[Value]) -> Result<Value, String> {
    Ok(Value::Number(Utc::now().timestamp_millis() as f64 / 1000.0))
}

fn type_of(_: &mut Interpreter, args: &[Value]) -> Result<Value, String> {
    let name = args.first().map_or("nuww", Value::type_name);

    Ok(Value::String(name.to_string()))
}

fn uwuify(_: &mut Interpreter, args: &[Value]) -> Result<Value, String> {
    let text = args.first().map(Value::to_string).unwrap_or_default();

    Ok(Value::String(uwu(&text)))
}

/// A space followed by one of [`EMOTICONS`], picked by the clock's
/// sub-second nanoseconds.
fn emoticon(_: &mut Interpreter, _: &[Value]) -> Result<Value, String> {
    let pick = Utc::now().timestamp_subsec_nanos() as usize % EMOTICONS.len();

    Ok(Value::String(format!(" {}", EMOTICONS[pick])))
}

fn is_vowel(c: char) -> bool {
    "aeiouAEIOU".contains(c)
}

/// Cute-ifies `text` in three passes:
/// 1. an `o` squeezed between two consonants inside a word becomes `u`
///    (not when followed by the text's final character);
/// 2. words longer than three characters lose a trailing `e`;
/// 3. `r` and `l` become `w`, then "you" becomes "chu".
pub fn uwu(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = text.to_string();

    if let Some(&last) = chars.last() {
        for window in chars.windows(3) {
            let (prev, cur, next) = (window[0], window[1], window[2]);

            if !is_vowel(prev)
                && !is_vowel(next)
                && cur.to_ascii_lowercase() == 'o'
                && !next.is_whitespace()
                && next != last
                && !prev.is_whitespace()
            {
                let u = if cur == 'o' { 'u' } else { 'U' };
                let from: String = [prev, cur, next].iter().collect();
                let to: String = [prev, u, next].iter().collect();
                out = out.replace(&from, &to);
            }
        }
    }

    let words: Vec<String> = out.split(' ').map(str::to_string).collect();
    for word in words {
        if word.to_lowercase().ends_with('e') && word.chars().count() > 3 {
            // The final character is an ASCII `e`/`E`.
            let trimmed = &word[..word.len() - 1];
            out = out.replace(&word, trimmed);
        }
    }

    out.replace('r', "w").replace('l', "w").replace("you", "chu")
}

#[cfg(test)]
mod tests {
    use super::uwu;

    #[test]
    fn uwu_replaces_liquids_and_you() {
        assert_eq!(uwu("are you ready"), "awe chu weady");
        assert_eq!(uwu("42"), "42");
        assert_eq!(uwu(""), "");
    }

    #[test]
    fn uwu_squeezes_o_between_consonants() {
        assert_eq!(uwu("hello world"), "hewwo wuwwd");
        assert_eq!(uwu("wOrds"), "wUwds");
        // Next to a vowel or a space the `o` stays.
        assert_eq!(uwu("boat no"), "boat no");
    }

    #[test]
    fn uwu_trims_trailing_e_from_long_words() {
        assert_eq!(uwu("Store"), "Stuw");
        assert_eq!(uwu("table time"), "tabw tim");
        assert_eq!(uwu("are"), "awe");
    }
}
