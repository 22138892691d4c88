//! Command sets: named registries of commands plus one helper bag.
//!
//! Records are kept as `Rc<Command>` in insertion order. `import` and
//! `import_from` share records with the source set, so a later `describe`
//! on either side is visible in both. `alias` builds a fresh record that
//! shares only the options cell and the handler body.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::command::{Args, Command, CommandFn, CommandOptions, CommandResult, NameList};
use crate::context::Context;
use crate::defaults;
use crate::error::CommandError;
use crate::gate;
use crate::helpers::HelperBag;
use crate::packages::PackageInstaller;

/// Named registry of commands.
pub struct CommandSet {
    name: String,
    commands: IndexMap<String, Rc<Command>>,
    helpers: HelperBag,
    installer: Rc<dyn PackageInstaller>,
}

impl CommandSet {
    /// Empty set. `installer` backs the dependency gate and `install`.
    pub fn new(name: impl Into<String>, installer: Rc<dyn PackageInstaller>) -> Self {
        Self {
            name: name.into(),
            commands: IndexMap::new(),
            helpers: HelperBag::new(),
            installer,
        }
    }

    /// Set that starts out with the default `help` and `install` commands.
    pub fn with_defaults(
        name: impl Into<String>,
        installer: Rc<dyn PackageInstaller>,
    ) -> Result<Self, CommandError> {
        let defaults = defaults::default_commands(Rc::clone(&installer))?;
        let mut set = Self::new(name, installer);
        set.import(&[&defaults]);
        Ok(set)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn installer(&self) -> &dyn PackageInstaller {
        &*self.installer
    }

    /// Define a command under one or more names; the first is canonical.
    ///
    /// Every name gets its own record; all of them share one options cell
    /// and one body, so clearing a stub heals every alias at once.
    pub fn define<F>(
        &mut self,
        names: impl Into<NameList>,
        description: impl Into<String>,
        options: CommandOptions,
        body: F,
    ) -> Result<(), CommandError>
    where
        F: Fn(&mut Context, &CommandSet, &Args) -> CommandResult + 'static,
    {
        let names = names.into();
        let Some(canonical) = names.first() else {
            return Err(CommandError::InvalidName("no command name given".into()));
        };
        if names.iter().any(str::is_empty) {
            return Err(CommandError::InvalidName(format!(
                "empty alias in definition of `{canonical}`"
            )));
        }

        let mut options = options;
        gate::apply(canonical, &mut options, &*self.installer);
        tracing::debug!(set = %self.name, command = canonical, stub = options.is_stub(), "define");

        let options = Rc::new(RefCell::new(options));
        let body: CommandFn = Rc::new(body);
        let description = description.into();
        for name in names.iter() {
            let record = Command::new(
                name.to_string(),
                description.clone(),
                Rc::clone(&options),
                Rc::clone(&body),
            );
            self.commands.insert(name.to_string(), Rc::new(record));
        }
        Ok(())
    }

    /// Remove commands by name. Unknown names are ignored.
    pub fn delete(&mut self, names: impl Into<NameList>) {
        for name in names.into().iter() {
            if self.commands.shift_remove(name).is_some() {
                tracing::debug!(set = %self.name, command = name, "delete");
            }
        }
    }

    /// Merge every command and helper of each set, in order. Last write wins.
    pub fn import(&mut self, sets: &[&CommandSet]) {
        for set in sets {
            tracing::debug!(into = %self.name, from = %set.name, count = set.len(), "import");
            for (name, record) in &set.commands {
                self.commands.insert(name.clone(), Rc::clone(record));
            }
            self.helpers.include(&set.helpers);
        }
    }

    /// Include `set`'s helpers and copy the named records from it.
    ///
    /// Fails without changing anything when a name is missing from `set`.
    pub fn import_from(
        &mut self,
        set: &CommandSet,
        names: impl Into<NameList>,
    ) -> Result<(), CommandError> {
        let names = names.into();
        let records = names
            .iter()
            .map(|name| {
                set.commands
                    .get(name)
                    .map(|record| (name.to_string(), Rc::clone(record)))
                    .ok_or_else(|| set.no_such_command(name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.helpers.include(&set.helpers);
        for (name, record) in records {
            self.commands.insert(name, record);
        }
        Ok(())
    }

    /// Register `new_name` as a snapshot of `old_name`.
    ///
    /// The alias gets its own name and description; options and body stay
    /// shared with the original.
    pub fn alias(
        &mut self,
        new_name: &str,
        old_name: &str,
        description: Option<&str>,
    ) -> Result<(), CommandError> {
        if new_name.is_empty() {
            return Err(CommandError::InvalidName(format!(
                "empty alias for `{old_name}`"
            )));
        }
        let original = self
            .commands
            .get(old_name)
            .ok_or_else(|| self.no_such_command(old_name))?;
        let record = original.renamed(new_name.to_string(), description.map(str::to_string));
        tracing::debug!(set = %self.name, alias = new_name, of = old_name, "alias");
        self.commands.insert(new_name.to_string(), Rc::new(record));
        Ok(())
    }

    /// Overwrite the description stored on `name`'s record.
    pub fn describe(
        &mut self,
        name: &str,
        description: impl Into<String>,
    ) -> Result<(), CommandError> {
        let record = self.find(name).ok_or_else(|| self.no_such_command(name))?;
        record.set_description(description.into());
        Ok(())
    }

    /// Register helper operations for handlers run through this set.
    pub fn helpers(&mut self, define: impl FnOnce(&mut HelperBag)) {
        define(&mut self.helpers);
    }

    pub fn helper_bag(&self) -> &HelperBag {
        &self.helpers
    }

    pub fn find(&self, name: &str) -> Option<&Rc<Command>> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Commands keyed by name, in insertion order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.commands
            .iter()
            .map(|(name, record)| (name.as_str(), record.as_ref()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn no_such_command(&self, name: &str) -> CommandError {
        CommandError::NoSuchCommand {
            name: name.to_string(),
            set: self.name.clone(),
        }
    }
}

impl fmt::Debug for CommandSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSet")
            .field("name", &self.name)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("helpers", &self.helpers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{empty_set, noop};
    use serde_json::{json, Value};

    #[test]
    fn define_stores_one_record_per_name() {
        let mut set = empty_set("s");
        set.define(["ls", "dir"], "List things", CommandOptions::new(), noop)
            .unwrap();

        let ls = set.find("ls").unwrap();
        let dir = set.find("dir").unwrap();
        assert_eq!(ls.name(), "ls");
        assert_eq!(dir.name(), "dir");
        assert_eq!(dir.description(), "List things");
        assert!(ls.shares_options_with(dir));
    }

    #[test]
    fn define_rejects_empty_names() {
        let mut set = empty_set("s");
        let err = set
            .define(Vec::<String>::new(), "", CommandOptions::new(), noop)
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidName(_)));
        let err = set
            .define(["ok", ""], "", CommandOptions::new(), noop)
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidName(_)));
        assert!(set.is_empty());
    }

    #[test]
    fn redefining_a_name_overwrites_it() {
        let mut set = empty_set("s");
        set.define("x", "first", CommandOptions::new(), noop).unwrap();
        set.define("x", "second", CommandOptions::new(), noop).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.find("x").unwrap().description(), "second");
    }

    #[test]
    fn delete_ignores_missing_names() {
        let mut set = empty_set("s");
        set.define("a", "", CommandOptions::new(), noop).unwrap();
        set.define("b", "", CommandOptions::new(), noop).unwrap();
        set.delete(["a", "missing"]);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn every_key_matches_its_record_name() {
        let mut set = empty_set("s");
        set.define(["a", "b"], "", CommandOptions::new(), noop).unwrap();
        set.alias("c", "a", None).unwrap();
        let mut other = empty_set("o");
        other.define("d", "", CommandOptions::new(), noop).unwrap();
        set.import(&[&other]);

        for (key, record) in set.commands() {
            assert_eq!(key, record.name());
        }
    }

    #[test]
    fn alias_description_is_independent() {
        let mut set = empty_set("s");
        set.define("greet", "Greet somebody", CommandOptions::new(), noop)
            .unwrap();
        set.alias("hi", "greet", Some("Short greeting")).unwrap();

        set.describe("greet", "Changed").unwrap();
        assert_eq!(set.find("hi").unwrap().description(), "Short greeting");

        set.describe("hi", "Changed alias").unwrap();
        assert_eq!(set.find("greet").unwrap().description(), "Changed");
    }

    #[test]
    fn alias_without_description_copies_original() {
        let mut set = empty_set("s");
        set.define("greet", "Greet somebody", CommandOptions::new(), noop)
            .unwrap();
        set.alias("hi", "greet", None).unwrap();
        let alias = set.find("hi").unwrap();
        assert_eq!(alias.description(), "Greet somebody");
        assert!(alias.shares_options_with(set.find("greet").unwrap()));
    }

    #[test]
    fn alias_of_unknown_command_fails() {
        let mut set = empty_set("s");
        let err = set.alias("hi", "nope", None).unwrap_err();
        assert!(matches!(err, CommandError::NoSuchCommand { ref name, .. } if name == "nope"));
    }

    #[test]
    fn import_is_last_write_wins() {
        let mut a = empty_set("a");
        a.define("x", "from a", CommandOptions::new(), noop).unwrap();
        a.define("only_a", "", CommandOptions::new(), noop).unwrap();
        let mut b = empty_set("b");
        b.define("x", "from b", CommandOptions::new(), noop).unwrap();

        let mut target = empty_set("t");
        target.import(&[&a, &b]);

        assert!(Rc::ptr_eq(target.find("x").unwrap(), b.find("x").unwrap()));
        assert!(Rc::ptr_eq(
            target.find("only_a").unwrap(),
            a.find("only_a").unwrap()
        ));
    }

    #[test]
    fn import_from_shares_records_with_source() {
        let mut source = empty_set("src");
        source
            .define("x", "before", CommandOptions::new(), noop)
            .unwrap();
        source.define("y", "", CommandOptions::new(), noop).unwrap();
        source.helpers(|bag| {
            bag.define("shout", |_ctx, _args| Ok(Value::Null));
        });

        let mut target = empty_set("t");
        target.import_from(&source, "x").unwrap();
        assert!(!target.contains("y"));
        assert!(target.helper_bag().contains("shout"));

        source.describe("x", "after").unwrap();
        assert_eq!(target.find("x").unwrap().description(), "after");
    }

    #[test]
    fn import_from_with_unknown_name_changes_nothing() {
        let mut source = empty_set("src");
        source.define("x", "", CommandOptions::new(), noop).unwrap();
        let mut target = empty_set("t");
        let err = target.import_from(&source, ["x", "nope"]).unwrap_err();
        assert!(matches!(err, CommandError::NoSuchCommand { ref set, .. } if set == "src"));
        assert!(target.is_empty());
    }

    #[test]
    fn import_merges_helpers() {
        let mut a = empty_set("a");
        a.helpers(|bag| {
            bag.define("one", |_ctx, _args| Ok(json!(1)));
        });
        let mut b = empty_set("b");
        b.helpers(|bag| {
            bag.define("two", |_ctx, _args| Ok(json!(2)));
        });
        let mut target = empty_set("t");
        target.import(&[&a, &b]);
        assert!(target.helper_bag().contains("one"));
        assert!(target.helper_bag().contains("two"));
    }

    #[test]
    fn describe_unknown_command_fails() {
        let mut set = empty_set("s");
        assert!(set.describe("nope", "x").is_err());
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        fn name_strategy() -> impl Strategy<Value = String> {
            proptest::string::string_regex("[a-e]{1,2}").expect("regex")
        }

        proptest! {
            #[test]
            fn keys_always_match_record_names(
                defined in proptest::collection::vec(
                    proptest::collection::vec(name_strategy(), 1..3),
                    0..6
                ),
                aliases in proptest::collection::vec((name_strategy(), name_strategy()), 0..6),
                deleted in proptest::collection::vec(name_strategy(), 0..3)
            ) {
                let mut set = empty_set("p");
                for names in defined {
                    set.define(names, "d", CommandOptions::new(), noop).unwrap();
                }
                for (new_name, old_name) in &aliases {
                    let _ = set.alias(new_name, old_name, None);
                }
                set.delete(deleted);
                for (key, record) in set.commands() {
                    prop_assert_eq!(key, record.name());
                }
            }

            #[test]
            fn import_resolves_to_last_set_defining_a_name(
                a_names in proptest::collection::vec(name_strategy(), 0..6),
                b_names in proptest::collection::vec(name_strategy(), 0..6)
            ) {
                let mut a = empty_set("a");
                for name in &a_names {
                    a.define(name.as_str(), "a", CommandOptions::new(), noop).unwrap();
                }
                let mut b = empty_set("b");
                for name in &b_names {
                    b.define(name.as_str(), "b", CommandOptions::new(), noop).unwrap();
                }

                let mut target = empty_set("t");
                target.import(&[&a, &b]);
                for name in a_names.iter().chain(&b_names) {
                    let expected = b.find(name).or_else(|| a.find(name)).unwrap();
                    prop_assert!(Rc::ptr_eq(target.find(name).unwrap(), expected));
                }
            }
        }
    }
}
