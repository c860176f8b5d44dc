// demos/settings_flow.rs
// A settings use case: the list screen pushes a detail editor for the
// selected setting, the editor unwinds back to the list, and closing the
// list ends the flow.

use std::cell::RefCell;
use std::rc::Rc;

use waypoint::{
    Flow, Navigator, Presentable, Registration, Resolver, Screen, Transition, TransitionError,
    View, Window,
};

#[derive(Clone, Debug)]
struct Setting {
    key: String,
    value: String,
}

/// Console-backed stand-in for a platform view.
struct ConsoleView {
    name: String,
}

impl View for ConsoleView {
    fn push(&self, _destination: Rc<dyn View>, animated: bool) {
        println!("[{}] pushed next view (animated: {animated})", self.name);
    }

    fn present(&self, _destination: Rc<dyn View>, animated: bool) {
        println!("[{}] presented next view (animated: {animated})", self.name);
    }
}

/// Console-backed window.
#[derive(Default)]
struct ConsoleWindow {
    root: RefCell<Option<Rc<dyn View>>>,
}

impl Window for ConsoleWindow {
    fn root_view(&self) -> Option<Rc<dyn View>> {
        self.root.borrow().clone()
    }

    fn set_root_view(&self, view: Option<Rc<dyn View>>) {
        *self.root.borrow_mut() = view;
    }
}

struct SettingsListScreen {
    settings: Vec<Setting>,
    view: Rc<ConsoleView>,
    selected: Transition<Setting>,
    closed: Transition<()>,
    navigator: RefCell<Option<Navigator<SettingsListScreen>>>,
}

impl SettingsListScreen {
    fn select(&self, index: usize) -> Result<(), TransitionError> {
        let setting = self.settings[index].clone();
        println!("[list] user selected `{}`", setting.key);
        self.navigator
            .borrow()
            .as_ref()
            .expect("navigator bound")
            .navigate(&self.selected, setting, self)
    }

    fn close(&self) -> Result<(), TransitionError> {
        println!("[list] user closed settings");
        self.navigator
            .borrow()
            .as_ref()
            .expect("navigator bound")
            .navigate(&self.closed, (), self)
    }
}

impl Screen for SettingsListScreen {
    type Input = Vec<Setting>;

    fn bind_navigator(&self, navigator: Navigator<Self>) {
        *self.navigator.borrow_mut() = Some(navigator);
    }
}

impl Presentable for SettingsListScreen {
    fn view(&self) -> Rc<dyn View> {
        self.view.clone()
    }
}

struct SettingPresenter {
    setting: RefCell<Setting>,
}

impl SettingPresenter {
    fn apply(&self, value: &str) {
        self.setting.borrow_mut().value = value.to_string();
    }
}

struct SettingDetailScreen {
    presenter: Rc<SettingPresenter>,
    view: Rc<ConsoleView>,
    saved: Transition<()>,
    navigator: RefCell<Option<Navigator<SettingDetailScreen>>>,
}

impl SettingDetailScreen {
    fn save(&self, value: &str) -> Result<(), TransitionError> {
        self.presenter.apply(value);
        let setting = self.presenter.setting.borrow().clone();
        println!("[detail] saved `{}` = `{}`", setting.key, setting.value);
        self.navigator
            .borrow()
            .as_ref()
            .expect("navigator bound")
            .navigate(&self.saved, (), self)
    }
}

impl Screen for SettingDetailScreen {
    type Input = Setting;

    fn bind_navigator(&self, navigator: Navigator<Self>) {
        *self.navigator.borrow_mut() = Some(navigator);
    }
}

impl Presentable for SettingDetailScreen {
    fn view(&self) -> Rc<dyn View> {
        self.view.clone()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    waypoint::init();

    let resolver = Rc::new(Resolver::new());
    resolver.provide(|_| {
        Rc::new(ConsoleView {
            name: "setting-detail".into(),
        })
    });
    resolver.provide_with(|_, setting: Setting| {
        Rc::new(SettingPresenter {
            setting: RefCell::new(setting),
        })
    });

    let selected = Transition::<Setting>::new("setting-selected");
    let saved = Transition::<()>::new("setting-saved");
    let closed = Transition::<()>::new("settings-closed");

    let flow = Flow::new();
    let list = flow.add_node(Registration::singleton({
        let selected = selected.clone();
        let closed = closed.clone();
        move |settings| SettingsListScreen {
            settings,
            view: Rc::new(ConsoleView {
                name: "settings-list".into(),
            }),
            selected: selected.clone(),
            closed: closed.clone(),
            navigator: RefCell::new(None),
        }
    }));
    let detail = flow.add_node(Registration::singleton({
        let resolver = resolver.clone();
        let saved = saved.clone();
        move |setting: Setting| SettingDetailScreen {
            presenter: resolver.resolve_with(setting).expect("presenter provided"),
            view: resolver.resolve().expect("detail view provided"),
            saved: saved.clone(),
            navigator: RefCell::new(None),
        }
    }));

    flow.push(list, &selected, detail, true);
    flow.unwind(
        detail,
        &[saved.erased()],
        list,
        |detail: &SettingDetailScreen, list: Option<&SettingsListScreen>| {
            let setting = detail.presenter.setting.borrow();
            match list {
                Some(_) => println!(
                    "[flow] `{}` is now `{}`, back on the list",
                    setting.key, setting.value
                ),
                None => println!("[flow] the list was never shown"),
            }
        },
    );
    flow.end_on(list, &closed);
    flow.on_complete(|outcome| println!("[flow] settings finished: {outcome:?}"));

    let window = ConsoleWindow::default();
    let root = flow.start(
        list,
        vec![
            Setting {
                key: "appearance".into(),
                value: "light".into(),
            },
            Setting {
                key: "notifications".into(),
                value: "on".into(),
            },
        ],
    );
    window.set_root_view(Some(root.view()));

    // Scripted user session.
    root.select(0)?;
    let editor = flow.existing(detail).expect("detail was just pushed");
    editor.save("dark")?;
    root.close()?;

    Ok(())
}
