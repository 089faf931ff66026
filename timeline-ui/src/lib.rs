//! Widget timeline cho môi trường WebAssembly.

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::rc::Rc;

    use crate::browser::{
        apply_document_theme, current_viewport, location_scheme, BrowserFetch, LocalStorageStore,
    };
    use crate::{logging, styles};
    use chrono::Local;
    use serde_wasm_bindgen::from_value;
    use timeline_core::render::{EMPTY_MESSAGE, LOADING_MESSAGE};
    use timeline_core::{
        cache_token, load, load_preferences, next_scroll_offset, persist, AppState, Card, Effect,
        LoadError, LoadStatus, Preferences, RenderedTimeline, RequestId, ScrollDirection,
        SortOrder, Theme, TimelineConfig, ViewMode, Viewport,
    };
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{console, Document, Element, HtmlSelectElement, KeyboardEvent, Window};
    use yew::prelude::*;
    use yew::TargetCast;

    enum Command {
        Reload,
        ChangeView(ViewMode),
        ChangeTheme(Theme),
        ChangeSort(SortOrder),
        Finished {
            request: RequestId,
            result: Result<serde_json::Value, LoadError>,
            scheme: Option<String>,
        },
        Resize(Viewport),
    }

    /// Trạng thái widget cùng các effect của lệnh gần nhất, chờ được thực thi.
    #[derive(Clone, PartialEq)]
    struct WidgetModel {
        app: AppState,
        viewport: Viewport,
        pending: Rc<Vec<Effect>>,
        revision: u64,
    }

    impl WidgetModel {
        fn new(preferences: Preferences, viewport: Viewport) -> Self {
            Self {
                app: AppState::new(preferences),
                viewport,
                pending: Rc::default(),
                revision: 0,
            }
        }
    }

    impl Reducible for WidgetModel {
        type Action = Command;

        fn reduce(self: Rc<Self>, command: Command) -> Rc<Self> {
            let mut model = (*self).clone();
            let app = model.app.clone();
            let (app, effects) = match command {
                Command::Reload => app.on_reload(),
                Command::ChangeView(view) => app.on_view_change(view),
                Command::ChangeTheme(theme) => app.on_theme_change(theme),
                Command::ChangeSort(order) => app.on_sort_change(order),
                Command::Finished {
                    request,
                    result,
                    scheme,
                } => app.on_load_finished(request, result, scheme.as_deref()),
                Command::Resize(viewport) => {
                    model.viewport = viewport;
                    (app, Vec::new())
                }
            };
            model.app = app;
            model.pending = Rc::new(effects);
            model.revision += 1;
            Rc::new(model)
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct TimelineAppProps {
        pub config: TimelineConfig,
    }

    #[function_component(TimelineApp)]
    fn timeline_app(props: &TimelineAppProps) -> Html {
        let config = &props.config;

        use_effect_with((), |_| {
            if let Some(document) = web_sys::window().and_then(|window| window.document()) {
                if let Err(err) = styles::ensure_styles(&document) {
                    console::error_1(&err);
                }
            }
            || ()
        });

        let model = use_reducer(|| {
            WidgetModel::new(
                load_preferences(&LocalStorageStore::open()),
                current_viewport(),
            )
        });
        let scroller = use_node_ref();

        {
            let dispatcher = model.dispatcher();
            let theme = model.app.preferences.theme;
            use_effect_with((), move |_| {
                if let Err(err) = apply_document_theme(theme) {
                    console::error_1(&err);
                }
                dispatcher.dispatch(Command::Reload);
                || ()
            });
        }

        {
            let pending = Rc::clone(&model.pending);
            let dispatcher = model.dispatcher();
            let source = config.source.clone();
            use_effect_with(model.revision, move |_| {
                for effect in pending.iter() {
                    match *effect {
                        Effect::Fetch(request) => {
                            spawn_fetch(request, source.clone(), dispatcher.clone())
                        }
                        Effect::Persist(preference) => {
                            persist(&mut LocalStorageStore::open(), preference)
                        }
                        Effect::ApplyTheme(theme) => {
                            if let Err(err) = apply_document_theme(theme) {
                                console::error_1(&err);
                            }
                        }
                        Effect::Render => {}
                    }
                }
                || ()
            });
        }

        {
            let dispatcher = model.dispatcher();
            use_effect_with((), move |_| {
                let listener = Closure::<dyn Fn(Event)>::new(move |_: Event| {
                    dispatcher.dispatch(Command::Resize(current_viewport()));
                });
                let window = web_sys::window();
                listen(window.as_ref(), "resize", &listener);
                move || unlisten(window.as_ref(), "resize", &listener)
            });
        }

        let view = model.app.preferences.view;
        let step = config.scroll_step;
        {
            let scroller = scroller.clone();
            use_effect_with(view, move |view| {
                let view = *view;
                let listener = Closure::<dyn Fn(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                    if typing_in_control(&event) {
                        return;
                    }
                    if let Some(direction) = ScrollDirection::from_key(&event.key()) {
                        event.prevent_default();
                        scroll_by_step(&scroller, view, direction, step);
                    }
                });
                let window = web_sys::window();
                listen(window.as_ref(), "keydown", &listener);
                move || unlisten(window.as_ref(), "keydown", &listener)
            });
        }

        let dispatcher = model.dispatcher();
        let on_view = {
            let dispatcher = dispatcher.clone();
            Callback::from(move |event: Event| {
                if let Some(view) = selected_option::<ViewMode>(&event) {
                    dispatcher.dispatch(Command::ChangeView(view));
                }
            })
        };
        let on_theme = {
            let dispatcher = dispatcher.clone();
            Callback::from(move |event: Event| {
                if let Some(theme) = selected_option::<Theme>(&event) {
                    dispatcher.dispatch(Command::ChangeTheme(theme));
                }
            })
        };
        let on_sort = {
            let dispatcher = dispatcher.clone();
            Callback::from(move |event: Event| {
                if let Some(order) = selected_option::<SortOrder>(&event) {
                    dispatcher.dispatch(Command::ChangeSort(order));
                }
            })
        };
        let on_reload = {
            let dispatcher = dispatcher.clone();
            Callback::from(move |_: MouseEvent| dispatcher.dispatch(Command::Reload))
        };
        let scroll_button = |direction: ScrollDirection| {
            let scroller = scroller.clone();
            Callback::from(move |_: MouseEvent| scroll_by_step(&scroller, view, direction, step))
        };

        let preferences = model.app.preferences;
        let frame = model.app.frame(model.viewport, &config.layout);

        html! {
            <div class="timeline-root" data-theme={preferences.theme.as_str()}>
                <header class="timeline-toolbar">
                    <label class="toolbar-group">
                        <span class="toolbar-label">{"Bố cục"}</span>
                        <select onchange={on_view} aria-label="Chọn bố cục timeline">
                            { for ViewMode::ALL.into_iter().map(|mode| render_option(mode.as_str(), view_label(mode), mode == preferences.view)) }
                        </select>
                    </label>
                    <label class="toolbar-group">
                        <span class="toolbar-label">{"Giao diện"}</span>
                        <select onchange={on_theme} aria-label="Chọn giao diện">
                            { for Theme::ALL.into_iter().map(|theme| render_option(theme.as_str(), theme_label(theme), theme == preferences.theme)) }
                        </select>
                    </label>
                    <label class="toolbar-group">
                        <span class="toolbar-label">{"Thứ tự"}</span>
                        <select onchange={on_sort} aria-label="Chọn thứ tự sắp xếp">
                            { render_option(SortOrder::Ascending.as_str(), "Cũ → mới", preferences.sort == SortOrder::Ascending) }
                            { render_option(SortOrder::Descending.as_str(), "Mới → cũ", preferences.sort == SortOrder::Descending) }
                        </select>
                    </label>
                    <div class="toolbar-group">
                        <button type="button" onclick={scroll_button(ScrollDirection::Backward)} aria-label="Cuộn về trước">{"←"}</button>
                        <button type="button" onclick={scroll_button(ScrollDirection::Forward)} aria-label="Cuộn về sau">{"→"}</button>
                        <button type="button" onclick={on_reload} aria-label="Tải lại dữ liệu">{"Tải lại"}</button>
                    </div>
                    <span class="toolbar-status">{ status_text(&model.app) }</span>
                </header>
                <section class="timeline-viewport" ref={scroller.clone()} aria-live="polite">
                    { render_frame(&frame) }
                </section>
            </div>
        }
    }

    fn render_option(value: &'static str, label: &'static str, selected: bool) -> Html {
        html! { <option value={value} selected={selected}>{ label }</option> }
    }

    fn render_frame(frame: &RenderedTimeline) -> Html {
        match frame {
            RenderedTimeline::Loading => html! {
                <div class="timeline-state timeline-loading" aria-busy="true">{ LOADING_MESSAGE }</div>
            },
            RenderedTimeline::Empty => html! {
                <div class="timeline-state timeline-empty">{ EMPTY_MESSAGE }</div>
            },
            RenderedTimeline::Error { message } => html! {
                <div class="timeline-state timeline-error" role="alert">{ message.clone() }</div>
            },
            RenderedTimeline::Cards {
                view,
                extent,
                cards,
            } => {
                let style = extent
                    .map(|extent| format!("width:{}px;height:{}px", extent.width, extent.height));
                html! {
                    <div class="timeline-track" data-view={view.as_str()} style={style}>
                        { for cards.iter().map(render_card) }
                    </div>
                }
            }
        }
    }

    fn render_card(card: &Card) -> Html {
        let style = card
            .position
            .map(|position| format!("left:{}px;top:{}px", position.x, position.y));

        html! {
            <article class="timeline-card" style={style}>
                {
                    card.color.as_ref().map(|color| html! {
                        <span class="timeline-swatch" style={format!("background:{color}")}></span>
                    }).unwrap_or_default()
                }
                <time class="timeline-date">{ card.date_label.clone() }</time>
                <h3 class="timeline-title">{ card.title.clone() }</h3>
                {
                    if card.description.is_empty() {
                        Html::default()
                    } else {
                        html! { <p class="timeline-description">{ card.description.clone() }</p> }
                    }
                }
            </article>
        }
    }

    fn status_text(app: &AppState) -> String {
        match (&app.status, app.loaded_at) {
            (LoadStatus::Ready, Some(loaded_at)) => format!(
                "{} sự kiện · cập nhật lúc {}",
                app.events.len(),
                loaded_at.with_timezone(&Local).format("%H:%M:%S")
            ),
            (LoadStatus::Failed(_), _) => "Tải dữ liệu thất bại".to_string(),
            _ => String::new(),
        }
    }

    fn view_label(view: ViewMode) -> &'static str {
        match view {
            ViewMode::Graph => "Biểu đồ",
            ViewMode::Vertical => "Dọc",
            ViewMode::Horizontal => "Ngang",
        }
    }

    fn theme_label(theme: Theme) -> &'static str {
        match theme {
            Theme::Light => "Sáng",
            Theme::Dark => "Tối",
            Theme::Sepia => "Sepia",
        }
    }

    fn selected_option<T: std::str::FromStr>(event: &Event) -> Option<T> {
        let select: HtmlSelectElement = event.target_dyn_into()?;
        select.value().parse().ok()
    }

    fn typing_in_control(event: &KeyboardEvent) -> bool {
        event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .map(|element| matches!(element.tag_name().as_str(), "INPUT" | "SELECT" | "TEXTAREA"))
            .unwrap_or(false)
    }

    fn scroll_by_step(scroller: &NodeRef, view: ViewMode, direction: ScrollDirection, step: f64) {
        let Some(element) = scroller.cast::<Element>() else {
            return;
        };
        if view.scrolls_horizontally() {
            let max = f64::from(element.scroll_width() - element.client_width());
            let next = next_scroll_offset(f64::from(element.scroll_left()), direction, step, max);
            element.set_scroll_left(next as i32);
        } else {
            let max = f64::from(element.scroll_height() - element.client_height());
            let next = next_scroll_offset(f64::from(element.scroll_top()), direction, step, max);
            element.set_scroll_top(next as i32);
        }
    }

    fn spawn_fetch(request: RequestId, source: String, dispatcher: UseReducerDispatcher<WidgetModel>) {
        spawn_local(async move {
            let result = load(&BrowserFetch, &source, cache_token()).await;
            dispatcher.dispatch(Command::Finished {
                request,
                result,
                scheme: location_scheme(),
            });
        });
    }

    fn listen<T: ?Sized>(window: Option<&Window>, event: &str, listener: &Closure<T>) {
        let Some(window) = window else {
            return;
        };
        if let Err(err) =
            window.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
        {
            console::error_1(&err);
        }
    }

    fn unlisten<T: ?Sized>(window: Option<&Window>, event: &str, listener: &Closure<T>) {
        if let Some(window) = window {
            let _ = window
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
        }
    }

    /// Gắn widget vào phần tử khớp `selector`. `config` là `TimelineConfig` dạng JS (có thể thiếu trường).
    #[wasm_bindgen]
    pub fn mount_timeline(selector: &str, config: Option<JsValue>) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        logging::init();

        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        let config: TimelineConfig = match config {
            Some(value) if !value.is_undefined() && !value.is_null() => from_value(value)?,
            _ => TimelineConfig::default(),
        };
        config
            .validate()
            .map_err(|err| JsValue::from_str(&format!("Timeline error: {err}")))?;

        yew::Renderer::<TimelineApp>::with_root_and_props(target, TimelineAppProps { config })
            .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_timeline;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_timeline(
    _: &str,
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "timeline-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
