//! Route back-stack and the auth-driven transitions between screens.
//!
//! The stack is never empty: it starts at `[Login]` and every transition
//! leaves exactly one route on top. `Home` always carries the session it was
//! entered with, so nothing outside the stack holds "the current user".

use mylo_core::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Home(Session),
}

impl Route {
    pub fn kind(&self) -> RouteKind {
        match self {
            Route::Login => RouteKind::Login,
            Route::Register => RouteKind::Register,
            Route::Home(_) => RouteKind::Home,
        }
    }
}

/// Route identity without parameters, used for stack queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    Login,
    Register,
    Home,
}

impl RouteKind {
    pub fn title(self) -> &'static str {
        match self {
            RouteKind::Login => "Login",
            RouteKind::Register => "Register",
            RouteKind::Home => "Home",
        }
    }
}

/// Options applied by `Navigator::navigate` before pushing the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavOptions {
    pub pop_up_to: Option<RouteKind>,
    pub inclusive: bool,
    /// Skip the push if the target kind is already on top.
    pub single_top: bool,
}

impl NavOptions {
    pub fn pop_inclusive(kind: RouteKind) -> Self {
        Self {
            pop_up_to: Some(kind),
            inclusive: true,
            single_top: false,
        }
    }

    #[must_use]
    pub fn single_top(mut self) -> Self {
        self.single_top = true;
        self
    }
}

/// Events that move the navigator. Each is only valid from one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    SignedIn(Session),
    GoToRegister,
    SignedUp(Session),
    GoToLogin,
    SignedOut,
}

impl NavEvent {
    fn source(&self) -> RouteKind {
        match self {
            NavEvent::SignedIn(_) | NavEvent::GoToRegister => RouteKind::Login,
            NavEvent::SignedUp(_) | NavEvent::GoToLogin => RouteKind::Register,
            NavEvent::SignedOut => RouteKind::Home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Login],
        }
    }

    pub fn current(&self) -> &Route {
        static ROOT: Route = Route::Login;
        self.stack.last().unwrap_or(&ROOT)
    }

    pub fn stack(&self) -> &[Route] {
        &self.stack
    }

    pub fn contains(&self, kind: RouteKind) -> bool {
        self.stack.iter().any(|route| route.kind() == kind)
    }

    /// Pops entries above the newest `kind` (and `kind` itself if `inclusive`).
    /// Does nothing if `kind` is not on the stack.
    pub fn pop_up_to(&mut self, kind: RouteKind, inclusive: bool) {
        let Some(index) = self.stack.iter().rposition(|route| route.kind() == kind) else {
            return;
        };
        let keep = if inclusive { index } else { index + 1 };
        self.stack.truncate(keep);
    }

    pub fn navigate(&mut self, route: Route, options: NavOptions) {
        if let Some(kind) = options.pop_up_to {
            self.pop_up_to(kind, options.inclusive);
        }
        if options.single_top && self.stack.last().map(Route::kind) == Some(route.kind()) {
            if let Some(top) = self.stack.last_mut() {
                *top = route;
            }
            return;
        }
        self.stack.push(route);
    }

    /// Pops the top route. Returns false (and keeps the stack) if it is the only one.
    pub fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }

    /// Applies an auth/navigation event. Returns false if the event does not
    /// belong to the current route; the stack is then untouched.
    pub fn apply(&mut self, event: NavEvent) -> bool {
        if event.source() != self.current().kind() {
            return false;
        }
        match event {
            NavEvent::SignedIn(session) => {
                self.navigate(
                    Route::Home(session),
                    NavOptions::pop_inclusive(RouteKind::Login),
                );
            }
            NavEvent::GoToRegister => self.navigate(Route::Register, NavOptions::default()),
            NavEvent::SignedUp(session) => {
                self.navigate(
                    Route::Home(session),
                    NavOptions::pop_inclusive(RouteKind::Login),
                );
            }
            NavEvent::GoToLogin => {
                self.navigate(
                    Route::Login,
                    NavOptions::pop_inclusive(RouteKind::Register).single_top(),
                );
            }
            NavEvent::SignedOut => {
                self.navigate(Route::Login, NavOptions::pop_inclusive(RouteKind::Home));
            }
        }
        true
    }
}
