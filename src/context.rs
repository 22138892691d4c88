//! Host-supplied execution context handed to every command handler.
//!
//! The context owns the output sink, the host's command predicate used by the
//! pipe protocol, the pager behind `stagger_output`, the helper operations
//! applied by the dispatching set, and an optional typed slot for host state.

use std::any::Any;
use std::cell::RefCell;
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use serde_json::Value;

use crate::error::CommandError;
use crate::helpers::HelperBag;

/// Host predicate deciding whether a token names a runnable command.
pub trait CommandProcessor {
    fn valid_command(&self, name: &str) -> bool;
}

impl<F> CommandProcessor for F
where
    F: Fn(&str) -> bool,
{
    fn valid_command(&self, name: &str) -> bool {
        self(name)
    }
}

/// Paginates long blocks of text written on behalf of a command.
pub trait Pager {
    fn stagger(&self, text: &str, out: &mut dyn Write) -> io::Result<()>;
}

/// Pager that writes the whole block in one go.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainPager;

impl Pager for PlainPager {
    fn stagger(&self, text: &str, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

/// Cloneable in-memory text sink. Every clone appends to the same buffer.
#[derive(Debug, Default, Clone)]
pub struct CaptureBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }

    /// Drain the buffer, returning what was written.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.bytes.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.borrow().is_empty()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Execution context a command runs against.
pub struct Context {
    output: Box<dyn Write>,
    processor: Rc<dyn CommandProcessor>,
    pager: Box<dyn Pager>,
    helpers: HelperBag,
    state: Option<Box<dyn Any>>,
}

impl Context {
    pub fn new(output: impl Write + 'static, processor: Rc<dyn CommandProcessor>) -> Self {
        Self {
            output: Box::new(output),
            processor,
            pager: Box::new(PlainPager),
            helpers: HelperBag::new(),
            state: None,
        }
    }

    /// Replace the pager used by [`Context::stagger_output`].
    pub fn with_pager(mut self, pager: impl Pager + 'static) -> Self {
        self.pager = Box::new(pager);
        self
    }

    /// Attach arbitrary host state that handlers can reach by type.
    pub fn with_state<T: Any>(mut self, state: T) -> Self {
        self.state = Some(Box::new(state));
        self
    }

    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    /// Write `text` as a line: a newline is appended unless already present.
    pub fn puts(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        let text = text.as_ref();
        self.output.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            self.output.write_all(b"\n")?;
        }
        self.output.flush()
    }

    /// Hand a block of text to the pager.
    pub fn stagger_output(&mut self, text: &str) -> io::Result<()> {
        self.pager.stagger(text, &mut *self.output)
    }

    pub fn valid_command(&self, name: &str) -> bool {
        self.processor.valid_command(name)
    }

    /// Helper operations currently applied to this context.
    pub fn helpers(&self) -> &HelperBag {
        &self.helpers
    }

    /// Merge a set's helper bag into this context. Additive and idempotent.
    pub fn apply_helpers(&mut self, bag: &HelperBag) {
        self.helpers.include(bag);
    }

    /// Call an applied helper operation by name.
    pub fn call_helper(&mut self, name: &str, args: &[Value]) -> Result<Value, CommandError> {
        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| CommandError::NoSuchHelper(name.to_string()))?;
        helper(self, args)
    }

    pub fn state<T: Any>(&self) -> Option<&T> {
        self.state.as_ref()?.downcast_ref::<T>()
    }

    pub fn state_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.state.as_mut()?.downcast_mut::<T>()
    }

    /// Swap the output sink for an in-memory buffer until the guard drops.
    pub fn redirect_output(&mut self) -> OutputRedirect<'_> {
        let buffer = CaptureBuffer::new();
        let saved = std::mem::replace(&mut self.output, Box::new(buffer.clone()));
        OutputRedirect {
            ctx: self,
            saved: Some(saved),
            buffer,
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("helpers", &self.helpers)
            .field("has_state", &self.state.is_some())
            .finish_non_exhaustive()
    }
}

/// Scoped capture of a context's output.
///
/// Dereferences to the context so handlers can run through it. The previous
/// sink is restored when the guard drops, on success and failure alike.
pub struct OutputRedirect<'a> {
    ctx: &'a mut Context,
    saved: Option<Box<dyn Write>>,
    buffer: CaptureBuffer,
}

impl OutputRedirect<'_> {
    /// Text written while the redirect was active.
    pub fn captured(&self) -> String {
        self.buffer.contents()
    }
}

impl Deref for OutputRedirect<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        &*self.ctx
    }
}

impl DerefMut for OutputRedirect<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        &mut *self.ctx
    }
}

impl Drop for OutputRedirect<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.ctx.output = saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{capture_context, processor_for};
    use serde_json::json;

    #[test]
    fn puts_appends_newline_only_when_missing() {
        let (mut ctx, out) = capture_context(&[]);
        ctx.puts("one").unwrap();
        ctx.puts("two\n").unwrap();
        ctx.puts("").unwrap();
        assert_eq!(out.contents(), "one\ntwo\n\n");
    }

    #[test]
    fn redirect_captures_and_restores_output() {
        let (mut ctx, out) = capture_context(&[]);
        {
            let mut redirect = ctx.redirect_output();
            redirect.puts("hidden").unwrap();
            assert_eq!(redirect.captured(), "hidden\n");
        }
        ctx.puts("visible").unwrap();
        assert_eq!(out.contents(), "visible\n");
    }

    #[test]
    fn redirect_restores_output_when_inner_work_fails() {
        fn failing(ctx: &mut Context) -> Result<(), CommandError> {
            let mut redirect = ctx.redirect_output();
            redirect.puts("partial")?;
            Err(CommandError::Failed("inner".into()))
        }

        let (mut ctx, out) = capture_context(&[]);
        assert!(failing(&mut ctx).is_err());
        ctx.puts("after").unwrap();
        assert_eq!(out.contents(), "after\n");
    }

    #[test]
    fn closures_act_as_command_processors() {
        let processor = processor_for(&["ls", "cd"]);
        assert!(processor.valid_command("ls"));
        assert!(!processor.valid_command("rm"));
    }

    #[test]
    fn stagger_output_goes_through_pager() {
        struct Shouting;
        impl Pager for Shouting {
            fn stagger(&self, text: &str, out: &mut dyn Write) -> io::Result<()> {
                out.write_all(text.to_uppercase().as_bytes())
            }
        }

        let (ctx, out) = capture_context(&[]);
        let mut ctx = ctx.with_pager(Shouting);
        ctx.stagger_output("page one\n").unwrap();
        assert_eq!(out.contents(), "PAGE ONE\n");
    }

    #[test]
    fn call_helper_reports_unknown_names() {
        let (mut ctx, _out) = capture_context(&[]);
        let err = ctx.call_helper("missing", &[json!(1)]).unwrap_err();
        assert!(matches!(err, CommandError::NoSuchHelper(name) if name == "missing"));
    }

    #[test]
    fn typed_state_round_trips_by_type() {
        let (ctx, _out) = capture_context(&[]);
        let mut ctx = ctx.with_state(41_u32);
        *ctx.state_mut::<u32>().unwrap() += 1;
        assert_eq!(ctx.state::<u32>(), Some(&42));
        assert!(ctx.state::<String>().is_none());
    }

    #[test]
    fn capture_buffer_take_drains() {
        let mut buffer = CaptureBuffer::new();
        buffer.write_all(b"abc").unwrap();
        assert_eq!(buffer.take(), "abc");
        assert!(buffer.is_empty());
    }
}
