//! Commands the bundled binary registers on top of the defaults.

use std::io::Write;
use std::rc::Rc;

use serde_json::{json, Value};

use crate::command::{Arity, CommandOptions};
use crate::error::CommandError;
use crate::packages::PackageInstaller;
use crate::set::CommandSet;

/// Package the `fortune` command depends on.
pub const FORTUNE_PACKAGE: &str = "fortune-kind";

/// Build the host set: optional defaults, then the demo commands.
pub fn demo_set(
    name: &str,
    installer: Rc<dyn PackageInstaller>,
    with_defaults: bool,
) -> Result<CommandSet, CommandError> {
    let mut set = if with_defaults {
        CommandSet::with_defaults(name, installer)?
    } else {
        CommandSet::new(name, installer)
    };

    set.helpers(|bag| {
        bag.define("capitalize", |_ctx, args| {
            let text = args.first().and_then(Value::as_str).unwrap_or_default();
            Ok(json!(capitalize(text)))
        });
    });

    set.define(
        "greet",
        "Greet somebody",
        CommandOptions::new().with_arity(Arity::Fixed(1)),
        |ctx, _set, args| {
            let who = ctx.call_helper("capitalize", &[json!(args.get(0).unwrap_or_default())])?;
            ctx.puts(format!("Good afternoon {}", who.as_str().unwrap_or_default()))?;
            Ok(None)
        },
    )?;
    set.alias("hi", "greet", Some("Short for greet"))?;

    set.define("echo", "Print the arguments", CommandOptions::new(), |ctx, _set, args| {
        ctx.puts(args.joined())?;
        Ok(None)
    })?;

    set.define(
        "upcase",
        "Upper-case the arguments and return them",
        CommandOptions::new()
            .with_keep_retval(true)
            .with_argument_required(true),
        |ctx, _set, args| {
            let text = args.joined().to_uppercase();
            ctx.puts(&text)?;
            Ok(Some(json!(text)))
        },
    )?;

    set.define(
        "wc",
        "Count lines, words and characters of the arguments",
        CommandOptions::new(),
        |ctx, _set, args| {
            let text = args.present().collect::<Vec<_>>().join("\n");
            let (lines, words, chars) = word_count(&text);
            writeln!(ctx.output(), "{lines} {words} {chars}")?;
            Ok(None)
        },
    )?;

    set.define(
        "fortune",
        "Print a fortune",
        CommandOptions::new().with_requires_gem(FORTUNE_PACKAGE),
        |ctx, _set, _args| {
            ctx.puts("You will write a command set today.")?;
            Ok(None)
        },
    )?;

    Ok(set)
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn word_count(text: &str) -> (usize, usize, usize) {
    if text.is_empty() {
        return (0, 0, 0);
    }
    (
        text.lines().count(),
        text.split_whitespace().count(),
        text.chars().count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::OfflineInstaller;
    use crate::testsupport::{capture_context, tokens};

    fn offline(installed: &[&str]) -> Rc<OfflineInstaller> {
        Rc::new(OfflineInstaller::new(
            installed.iter().copied(),
            [FORTUNE_PACKAGE],
        ))
    }

    #[test]
    fn capitalize_matches_title_case_of_one_word() {
        assert_eq!(capitalize("john"), "John");
        assert_eq!(capitalize("mARY"), "Mary");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn word_count_of_empty_text_is_zero() {
        assert_eq!(word_count(""), (0, 0, 0));
        assert_eq!(word_count("a b\nc"), (2, 3, 5));
    }

    #[test]
    fn greet_and_alias_share_handler() {
        let set = demo_set("demo", offline(&[]), true).unwrap();
        let (mut ctx, out) = capture_context(&[]);
        set.run(&mut ctx, "greet", &tokens(&["john"])).unwrap();
        set.run(&mut ctx, "hi", &tokens(&["ann", "extra"])).unwrap();
        assert_eq!(out.contents(), "Good afternoon John\nGood afternoon Ann\n");
        assert_eq!(set.find("hi").unwrap().description(), "Short for greet");
    }

    #[test]
    fn fortune_is_stubbed_until_installed() {
        let set = demo_set("demo", offline(&[]), true).unwrap();
        assert!(set.find("fortune").unwrap().options().is_stub());

        let set = demo_set("demo", offline(&[FORTUNE_PACKAGE]), true).unwrap();
        assert!(!set.find("fortune").unwrap().options().is_stub());
    }

    #[test]
    fn defaults_can_be_left_out() {
        let set = demo_set("demo", offline(&[]), false).unwrap();
        assert!(!set.contains("help"));
        assert!(set.contains("greet"));
    }

    #[test]
    fn echo_pipes_into_wc() {
        let set = demo_set("demo", offline(&[]), true).unwrap();
        let (mut ctx, out) = capture_context(&["wc"]);
        set.run(&mut ctx, "echo", &tokens(&["one", "two", "|", "wc"]))
            .unwrap();
        assert_eq!(out.contents(), "1 2 7\n");
    }
}
