//! Modal input dispatcher
//!
//! Button edges latched during the last sleep are interpreted once per wake
//! cycle in one of three mutually exclusive modes:
//!
//! - **Normal**: buttons go to the current module, following a fixed
//!   precedence (long settings, settings, long function, function, up+down,
//!   up, down). A short settings press opens the menu unless the module bound
//!   a long-settings handler; likewise a bound long-function handler
//!   reserves the short function press.
//! - **Menu navigation**: up/down walk the module ring, settings picks the
//!   highlighted module. With no input for the menu timeout, the module that
//!   was current before navigation started comes back.
//! - **Field edit**: entered from a module handler through
//!   [`Control::edit_start`](crate::runtime::Control::edit_start). Function
//!   moves between fields, up/down adjust the selected field, settings or the
//!   edit timeout leave and run the completion callback.
//!
//! Menu navigation and field edit own every button while active. Timeouts
//! are cooperative: they are checked against the monotonic second counter
//! each cycle, so they may fire up to one sleep interval late but never
//! early.

use heapless::Vec;
use log::{debug, warn};

use crate::bus::MessageBus;
use crate::error::CoreError;
use crate::events::Buttons;
use crate::menu::{Direction, Handler, MenuRing};
use crate::runtime::Control;

/// Maximum number of fields in one edit session.
pub const MAX_EDIT_ITEMS: usize = 8;

/// Select/deselect callback, called with the field position.
pub type EditCallback<C> = fn(&mut C, usize);

/// Adjust callback, called with the field position and +1 or -1.
pub type EditSet<C> = fn(&mut C, usize, i8);

/// Called once when an edit session ends, by button or by timeout.
pub type Completion<C> = fn(&mut C);

/// One editable field.
///
/// An item without `set` is a sentinel: it is never selected and marks the
/// end of the usable list.
pub struct EditItem<C> {
    pub select: EditCallback<C>,
    pub deselect: EditCallback<C>,
    pub set: Option<EditSet<C>>,
}

fn noop<C>(_ctx: &mut C, _pos: usize) {}

impl<C> EditItem<C> {
    pub const fn new(select: EditCallback<C>, deselect: EditCallback<C>, set: EditSet<C>) -> Self {
        Self {
            select,
            deselect,
            set: Some(set),
        }
    }

    pub const fn sentinel() -> Self {
        Self {
            select: noop::<C>,
            deselect: noop::<C>,
            set: None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.set.is_none()
    }
}

impl<C> Clone for EditItem<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for EditItem<C> {}

/// A validated request to enter field edit mode.
pub(crate) struct EditRequest<C> {
    items: Vec<EditItem<C>, MAX_EDIT_ITEMS>,
    complete: Completion<C>,
}

impl<C> EditRequest<C> {
    pub(crate) fn new(complete: Completion<C>, items: &[EditItem<C>]) -> Result<Self, CoreError> {
        let items = Vec::from_slice(items).map_err(|_| CoreError::TooManyEditItems {
            len: items.len(),
            capacity: MAX_EDIT_ITEMS,
        })?;

        if items.iter().all(EditItem::is_sentinel) {
            return Err(CoreError::NoEditableItems);
        }

        Ok(Self { items, complete })
    }
}

enum ModeState<C> {
    Normal,
    MenuNav {
        /// Ring index that was current when navigation started
        return_to: usize,
        deadline: u32,
    },
    FieldEdit {
        items: Vec<EditItem<C>, MAX_EDIT_ITEMS>,
        pos: usize,
        deadline: u32,
        complete: Completion<C>,
    },
}

/// Read-only view of the dispatcher mode, for the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    MenuNav {
        /// Name of the module the ring currently points at
        highlighted: &'static str,
        deadline: u32,
    },
    FieldEdit {
        position: usize,
        deadline: u32,
    },
}

/// `true` once `now` reached `deadline`, tolerant of the counter wrapping.
pub(crate) fn deadline_reached(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// Next position after `pos` whose item can be adjusted, wrapping around.
fn next_editable<C>(items: &[EditItem<C>], pos: usize) -> usize {
    (1..=items.len())
        .map(|step| (pos + step) % items.len())
        .find(|&i| !items[i].is_sentinel())
        .unwrap_or(pos)
}

pub(crate) struct InputDispatcher<C> {
    state: ModeState<C>,
    menu_timeout: u32,
    edit_timeout: u32,
}

impl<C> InputDispatcher<C> {
    pub(crate) const fn new(menu_timeout_secs: u8, edit_timeout_secs: u8) -> Self {
        Self {
            state: ModeState::Normal,
            menu_timeout: menu_timeout_secs as u32,
            edit_timeout: edit_timeout_secs as u32,
        }
    }

    pub(crate) fn mode(&self, menu: &MenuRing<C>) -> Mode {
        match &self.state {
            ModeState::Normal => Mode::Normal,
            ModeState::MenuNav { deadline, .. } => Mode::MenuNav {
                highlighted: menu.current_name().unwrap_or(""),
                deadline: *deadline,
            },
            ModeState::FieldEdit { pos, deadline, .. } => Mode::FieldEdit {
                position: *pos,
                deadline: *deadline,
            },
        }
    }

    /// Run one wake cycle worth of input handling.
    pub(crate) fn handle(
        &mut self,
        ctx: &mut C,
        buttons: Buttons,
        now: u32,
        menu: &mut MenuRing<C>,
        bus: &mut MessageBus<C>,
    ) {
        match self.state {
            ModeState::FieldEdit { .. } => self.handle_edit(ctx, buttons, now),
            ModeState::MenuNav { .. } => self.handle_menu(ctx, buttons, now, menu, bus),
            ModeState::Normal => self.handle_normal(ctx, buttons, now, menu, bus),
        }
    }

    /// Run a module handler and enter edit mode if it asked for it.
    pub(crate) fn invoke(
        &mut self,
        handler: Option<Handler<C>>,
        ctx: &mut C,
        now: u32,
        bus: &mut MessageBus<C>,
    ) {
        let Some(handler) = handler else {
            return;
        };

        if let Some(request) = Control::run(handler, ctx, bus, now) {
            if matches!(self.state, ModeState::Normal) {
                self.start_edit(ctx, request, now);
            } else {
                warn!("Edit request ignored outside of normal mode");
            }
        }
    }

    fn start_edit(&mut self, ctx: &mut C, request: EditRequest<C>, now: u32) {
        let EditRequest { items, complete } = request;
        // Validation guarantees at least one usable item.
        let pos = if items[0].is_sentinel() {
            next_editable(&items, 0)
        } else {
            0
        };

        (items[pos].select)(ctx, pos);
        debug!("Entering edit mode with {} items", items.len());

        self.state = ModeState::FieldEdit {
            items,
            pos,
            deadline: now.wrapping_add(self.edit_timeout),
            complete,
        };
    }

    fn handle_normal(
        &mut self,
        ctx: &mut C,
        buttons: Buttons,
        now: u32,
        menu: &mut MenuRing<C>,
        bus: &mut MessageBus<C>,
    ) {
        if buttons.is_empty() {
            return;
        }
        let Some(handlers) = menu.current().map(|m| m.handlers) else {
            return;
        };

        if buttons.contains(Buttons::LONG_SETTINGS) {
            self.invoke(handlers.long_settings, ctx, now, bus);
        } else if buttons.contains(Buttons::SETTINGS) && handlers.long_settings.is_none() {
            self.enter_menu(ctx, now, menu, bus);
        } else if buttons.contains(Buttons::LONG_FUNCTION) {
            self.invoke(handlers.long_function, ctx, now, bus);
        } else if buttons.contains(Buttons::FUNCTION) && handlers.long_function.is_none() {
            self.invoke(handlers.function, ctx, now, bus);
        } else if buttons.contains(Buttons::UP | Buttons::DOWN) {
            self.invoke(handlers.up_down, ctx, now, bus);
        } else if buttons.contains(Buttons::UP) {
            self.invoke(handlers.up, ctx, now, bus);
        } else if buttons.contains(Buttons::DOWN) {
            self.invoke(handlers.down, ctx, now, bus);
        }
    }

    fn enter_menu(
        &mut self,
        ctx: &mut C,
        now: u32,
        menu: &mut MenuRing<C>,
        bus: &mut MessageBus<C>,
    ) {
        let Some(return_to) = menu.current_index() else {
            return;
        };

        if let Some(deactivate) = menu.current().and_then(|m| m.handlers.deactivate) {
            if Control::run(deactivate, ctx, bus, now).is_some() {
                warn!("Edit request from deactivate handler ignored");
            }
        }

        self.state = ModeState::MenuNav {
            return_to,
            deadline: now.wrapping_add(self.menu_timeout),
        };
        debug!("Menu opened on '{}'", menu.current_name().unwrap_or(""));
    }

    fn handle_menu(
        &mut self,
        ctx: &mut C,
        buttons: Buttons,
        now: u32,
        menu: &mut MenuRing<C>,
        bus: &mut MessageBus<C>,
    ) {
        let ModeState::MenuNav { return_to, deadline } = &mut self.state else {
            return;
        };

        let timed_out = deadline_reached(now, *deadline);
        if timed_out || buttons.contains(Buttons::SETTINGS) {
            if timed_out {
                menu.set_current(*return_to);
            }
            self.state = ModeState::Normal;
            debug!(
                "Menu closed{} on '{}'",
                if timed_out { " by timeout" } else { "" },
                menu.current_name().unwrap_or("")
            );

            let activate = menu.current().and_then(|m| m.handlers.activate);
            self.invoke(activate, ctx, now, bus);
        } else if buttons.contains(Buttons::UP) {
            *deadline = now.wrapping_add(self.menu_timeout);
            menu.advance(Direction::Next);
        } else if buttons.contains(Buttons::DOWN) {
            *deadline = now.wrapping_add(self.menu_timeout);
            menu.advance(Direction::Prev);
        }
    }

    fn handle_edit(&mut self, ctx: &mut C, buttons: Buttons, now: u32) {
        let edit_timeout = self.edit_timeout;
        let ModeState::FieldEdit {
            items,
            pos,
            deadline,
            complete,
        } = &mut self.state
        else {
            return;
        };

        if buttons.contains(Buttons::SETTINGS) || deadline_reached(now, *deadline) {
            (items[*pos].deselect)(ctx, *pos);
            let complete = *complete;
            self.state = ModeState::Normal;
            debug!("Leaving edit mode");
            complete(ctx);
        } else if buttons.contains(Buttons::FUNCTION) {
            *deadline = now.wrapping_add(edit_timeout);
            (items[*pos].deselect)(ctx, *pos);
            *pos = next_editable(items, *pos);
            (items[*pos].select)(ctx, *pos);
        } else if buttons.contains(Buttons::UP) {
            *deadline = now.wrapping_add(edit_timeout);
            if let Some(set) = items[*pos].set {
                set(ctx, *pos, 1);
            }
        } else if buttons.contains(Buttons::DOWN) {
            *deadline = now.wrapping_add(edit_timeout);
            if let Some(set) = items[*pos].set {
                set(ctx, *pos, -1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::menu::{Module, ModuleHandlers};
    use std::vec::Vec as StdVec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Up,
        Down,
        Function,
        LongSettings,
        LongFunction,
        UpDown,
        Activate(&'static str),
        Deactivate(&'static str),
        Select(usize),
        Deselect(usize),
        Set(usize, i8),
        Complete,
    }

    #[derive(Default)]
    struct Ctx {
        calls: StdVec<Call>,
    }

    fn up(ctx: &mut Ctx, _: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::Up);
    }
    fn down(ctx: &mut Ctx, _: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::Down);
    }
    fn function(ctx: &mut Ctx, _: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::Function);
    }
    fn long_function(ctx: &mut Ctx, _: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::LongFunction);
    }
    fn up_down(ctx: &mut Ctx, _: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::UpDown);
    }
    fn long_settings_noop(ctx: &mut Ctx, _: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::LongSettings);
    }
    fn activate_a(ctx: &mut Ctx, _: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::Activate("A"));
    }
    fn activate_b(ctx: &mut Ctx, _: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::Activate("B"));
    }
    fn activate_c(ctx: &mut Ctx, _: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::Activate("C"));
    }
    fn deactivate_a(ctx: &mut Ctx, _: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::Deactivate("A"));
    }

    fn select(ctx: &mut Ctx, pos: usize) {
        ctx.calls.push(Call::Select(pos));
    }
    fn deselect(ctx: &mut Ctx, pos: usize) {
        ctx.calls.push(Call::Deselect(pos));
    }
    fn set(ctx: &mut Ctx, pos: usize, step: i8) {
        ctx.calls.push(Call::Set(pos, step));
    }
    fn complete(ctx: &mut Ctx) {
        ctx.calls.push(Call::Complete);
    }

    fn long_settings_edit_two(ctx: &mut Ctx, control: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::LongSettings);
        control
            .edit_start(
                complete,
                &[
                    EditItem::new(select, deselect, set),
                    EditItem::new(select, deselect, set),
                    EditItem::sentinel(),
                ],
            )
            .unwrap();
    }

    fn long_settings_edit_with_sentinel(ctx: &mut Ctx, control: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::LongSettings);
        control
            .edit_start(
                complete,
                &[EditItem::new(select, deselect, set), EditItem::sentinel()],
            )
            .unwrap();
    }

    fn deactivate_requests_edit(ctx: &mut Ctx, control: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::Deactivate("A"));
        control
            .edit_start(complete, &[EditItem::new(select, deselect, set)])
            .unwrap();
    }

    fn activate_requests_edit(ctx: &mut Ctx, control: &mut Control<'_, Ctx>) {
        ctx.calls.push(Call::Activate("B"));
        control
            .edit_start(complete, &[EditItem::new(select, deselect, set)])
            .unwrap();
    }

    struct Harness {
        ctx: Ctx,
        menu: MenuRing<Ctx>,
        bus: MessageBus<Ctx>,
        input: InputDispatcher<Ctx>,
    }

    impl Harness {
        fn new(modules: &[Module<Ctx>]) -> Self {
            let mut menu = MenuRing::new();
            for module in modules {
                menu.add_entry(*module).unwrap();
            }
            Self {
                ctx: Ctx::default(),
                menu,
                bus: MessageBus::new(),
                input: InputDispatcher::new(5, 15),
            }
        }

        fn press(&mut self, buttons: Buttons, now: u32) {
            self.input
                .handle(&mut self.ctx, buttons, now, &mut self.menu, &mut self.bus);
        }

        fn mode(&self) -> Mode {
            self.input.mode(&self.menu)
        }

        fn take_calls(&mut self) -> StdVec<Call> {
            core::mem::take(&mut self.ctx.calls)
        }
    }

    fn abc() -> [Module<Ctx>; 3] {
        [
            Module::new(
                "A",
                ModuleHandlers::new()
                    .on_activate(activate_a)
                    .on_deactivate(deactivate_a),
            ),
            Module::new("B", ModuleHandlers::new().on_activate(activate_b)),
            Module::new("C", ModuleHandlers::new().on_activate(activate_c)),
        ]
    }

    #[test]
    fn test_normal_mode_routes_single_buttons() {
        let mut h = Harness::new(&[Module::new(
            "A",
            ModuleHandlers::new()
                .on_up(up)
                .on_down(down)
                .on_function(function)
                .on_up_down(up_down),
        )]);

        h.press(Buttons::UP, 0);
        h.press(Buttons::DOWN, 0);
        h.press(Buttons::FUNCTION, 0);
        h.press(Buttons::UP | Buttons::DOWN, 0);
        h.press(Buttons::empty(), 0);

        assert_eq!(
            h.take_calls(),
            [Call::Up, Call::Down, Call::Function, Call::UpDown]
        );
    }

    #[test]
    fn test_precedence_first_match_wins() {
        let mut h = Harness::new(&[Module::new(
            "A",
            ModuleHandlers::new()
                .on_up(up)
                .on_function(function)
                .on_long_function(long_function),
        )]);

        // Long function beats up.
        h.press(Buttons::LONG_FUNCTION | Buttons::UP, 0);
        assert_eq!(h.take_calls(), [Call::LongFunction]);

        // Short function is reserved by the long handler, so up gets through.
        h.press(Buttons::FUNCTION | Buttons::UP, 0);
        assert_eq!(h.take_calls(), [Call::Up]);
    }

    #[test]
    fn test_short_settings_opens_menu_without_long_settings() {
        let mut h = Harness::new(&abc());
        h.take_calls();

        h.press(Buttons::SETTINGS, 10);
        assert_eq!(
            h.mode(),
            Mode::MenuNav {
                highlighted: "A",
                deadline: 15
            }
        );
        assert_eq!(h.take_calls(), [Call::Deactivate("A")]);
    }

    #[test]
    fn test_short_settings_swallowed_with_long_settings_bound() {
        let mut h = Harness::new(&[Module::new(
            "A",
            ModuleHandlers::new().on_long_settings(long_settings_noop),
        )]);

        h.press(Buttons::SETTINGS, 10);
        assert_eq!(h.mode(), Mode::Normal);
        assert!(h.take_calls().is_empty());

        h.press(Buttons::LONG_SETTINGS, 11);
        assert_eq!(h.mode(), Mode::Normal);
        assert_eq!(h.take_calls(), [Call::LongSettings]);
    }

    #[test]
    fn test_menu_navigation_and_explicit_select() {
        let mut h = Harness::new(&abc());
        h.take_calls();

        h.press(Buttons::SETTINGS, 0);
        h.press(Buttons::UP, 1);
        h.press(Buttons::UP, 2);
        assert_eq!(
            h.mode(),
            Mode::MenuNav {
                highlighted: "C",
                deadline: 7
            }
        );
        h.press(Buttons::DOWN, 3);
        assert_eq!(h.menu.current_name(), Some("B"));

        h.press(Buttons::SETTINGS, 4);
        assert_eq!(h.mode(), Mode::Normal);
        assert_eq!(h.menu.current_name(), Some("B"));
        assert_eq!(
            h.take_calls(),
            [Call::Deactivate("A"), Call::Activate("B")]
        );
    }

    #[test]
    fn test_menu_timeout_restores_previous_module() {
        let mut h = Harness::new(&abc());
        h.take_calls();

        h.press(Buttons::SETTINGS, 100);
        h.press(Buttons::UP, 100);
        assert_eq!(h.menu.current_name(), Some("B"));

        for now in 101..105 {
            h.press(Buttons::empty(), now);
            assert!(matches!(h.mode(), Mode::MenuNav { .. }), "still open at {}", now);
        }

        h.press(Buttons::empty(), 105);
        assert_eq!(h.mode(), Mode::Normal);
        assert_eq!(h.menu.current_name(), Some("A"));
        assert_eq!(
            h.take_calls(),
            [Call::Deactivate("A"), Call::Activate("A")]
        );
    }

    #[test]
    fn test_menu_navigation_does_not_touch_modules() {
        let mut h = Harness::new(&abc());
        h.take_calls();

        h.press(Buttons::SETTINGS, 0);
        h.take_calls();
        h.press(Buttons::UP, 1);
        h.press(Buttons::DOWN, 2);
        h.press(Buttons::FUNCTION, 3);
        assert!(h.take_calls().is_empty());
    }

    #[test]
    fn test_long_settings_enters_edit_mode() {
        let mut h = Harness::new(&[Module::new(
            "A",
            ModuleHandlers::new().on_long_settings(long_settings_edit_two),
        )]);

        h.press(Buttons::LONG_SETTINGS, 20);
        assert_eq!(
            h.mode(),
            Mode::FieldEdit {
                position: 0,
                deadline: 35
            }
        );
        assert_eq!(h.take_calls(), [Call::LongSettings, Call::Select(0)]);
    }

    #[test]
    fn test_edit_mode_steps_and_adjusts() {
        let mut h = Harness::new(&[Module::new(
            "A",
            ModuleHandlers::new().on_long_settings(long_settings_edit_two),
        )]);
        h.press(Buttons::LONG_SETTINGS, 0);
        h.take_calls();

        h.press(Buttons::UP, 1);
        h.press(Buttons::FUNCTION, 2);
        h.press(Buttons::DOWN, 3);
        // Wraps past the sentinel back to the first field.
        h.press(Buttons::FUNCTION, 4);

        assert_eq!(
            h.take_calls(),
            [
                Call::Set(0, 1),
                Call::Deselect(0),
                Call::Select(1),
                Call::Set(1, -1),
                Call::Deselect(1),
                Call::Select(0),
            ]
        );
        assert_eq!(
            h.mode(),
            Mode::FieldEdit {
                position: 0,
                deadline: 19
            }
        );
    }

    #[test]
    fn test_edit_advance_skips_sentinel() {
        let mut h = Harness::new(&[Module::new(
            "A",
            ModuleHandlers::new().on_long_settings(long_settings_edit_with_sentinel),
        )]);
        h.press(Buttons::LONG_SETTINGS, 0);
        h.take_calls();

        h.press(Buttons::FUNCTION, 1);
        assert_eq!(h.take_calls(), [Call::Deselect(0), Call::Select(0)]);
        assert!(matches!(h.mode(), Mode::FieldEdit { position: 0, .. }));
    }

    #[test]
    fn test_edit_exit_by_settings_runs_completion() {
        let mut h = Harness::new(&[Module::new(
            "A",
            ModuleHandlers::new().on_long_settings(long_settings_edit_two),
        )]);
        h.press(Buttons::LONG_SETTINGS, 0);
        h.press(Buttons::FUNCTION, 1);
        h.take_calls();

        h.press(Buttons::SETTINGS, 2);
        assert_eq!(h.mode(), Mode::Normal);
        assert_eq!(h.take_calls(), [Call::Deselect(1), Call::Complete]);
    }

    #[test]
    fn test_edit_timeout_runs_completion() {
        let mut h = Harness::new(&[Module::new(
            "A",
            ModuleHandlers::new().on_long_settings(long_settings_edit_two),
        )]);
        h.press(Buttons::LONG_SETTINGS, 50);
        h.take_calls();

        h.press(Buttons::empty(), 64);
        assert!(matches!(h.mode(), Mode::FieldEdit { .. }));
        h.press(Buttons::empty(), 65);
        assert_eq!(h.mode(), Mode::Normal);
        assert_eq!(h.take_calls(), [Call::Deselect(0), Call::Complete]);
    }

    #[test]
    fn test_edit_input_resets_deadline() {
        let mut h = Harness::new(&[Module::new(
            "A",
            ModuleHandlers::new().on_long_settings(long_settings_edit_two),
        )]);
        h.press(Buttons::LONG_SETTINGS, 0);
        h.press(Buttons::UP, 10);
        h.press(Buttons::empty(), 24);
        assert!(matches!(h.mode(), Mode::FieldEdit { deadline: 25, .. }));
    }

    #[test]
    fn test_edit_request_from_deactivate_is_dropped() {
        let mut h = Harness::new(&[
            Module::new(
                "A",
                ModuleHandlers::new().on_deactivate(deactivate_requests_edit),
            ),
            Module::new("B", ModuleHandlers::new()),
        ]);

        h.press(Buttons::SETTINGS, 0);
        assert_eq!(
            h.mode(),
            Mode::MenuNav {
                highlighted: "A",
                deadline: 5
            }
        );
        assert_eq!(h.take_calls(), [Call::Deactivate("A")]);

        // Buttons still navigate the menu, not an edit session.
        h.press(Buttons::UP, 1);
        assert_eq!(h.menu.current_name(), Some("B"));
        assert!(h.take_calls().is_empty());
    }

    #[test]
    fn test_edit_request_from_activate_on_menu_exit_starts_edit() {
        let mut h = Harness::new(&[
            Module::new("A", ModuleHandlers::new()),
            Module::new(
                "B",
                ModuleHandlers::new().on_activate(activate_requests_edit),
            ),
        ]);

        h.press(Buttons::SETTINGS, 0);
        h.press(Buttons::UP, 1);
        h.press(Buttons::SETTINGS, 2);

        assert_eq!(
            h.mode(),
            Mode::FieldEdit {
                position: 0,
                deadline: 17
            }
        );
        assert_eq!(h.take_calls(), [Call::Activate("B"), Call::Select(0)]);
    }

    #[test]
    fn test_edit_request_validation() {
        assert_eq!(
            EditRequest::<Ctx>::new(complete, &[EditItem::sentinel()]).err(),
            Some(CoreError::NoEditableItems)
        );
        assert_eq!(
            EditRequest::<Ctx>::new(complete, &[]).err(),
            Some(CoreError::NoEditableItems)
        );

        let many = [EditItem::<Ctx>::new(select, deselect, set); MAX_EDIT_ITEMS + 1];
        assert_eq!(
            EditRequest::new(complete, &many).err(),
            Some(CoreError::TooManyEditItems {
                len: MAX_EDIT_ITEMS + 1,
                capacity: MAX_EDIT_ITEMS
            })
        );
    }

    #[test]
    fn test_deadline_reached_handles_wrap() {
        assert!(!deadline_reached(u32::MAX - 1, 3));
        assert!(deadline_reached(3, 3));
        assert!(deadline_reached(4, u32::MAX));
        assert!(!deadline_reached(99, 100));
    }
}
