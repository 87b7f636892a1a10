#![cfg(target_arch = "wasm32")]

//! History navigation in a real browser.

use std::cell::Cell;
use std::rc::Rc;

use idp_tour::Router;
use idp_tour_web::HistoryRouter;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn navigate_pushes_route_and_defers_popstate() {
    let window = web_sys::window().expect("window");
    let fired = Rc::new(Cell::new(0_u32));
    let counter = Rc::clone(&fired);
    let listener = Closure::wrap(Box::new(move |_: web_sys::Event| {
        counter.set(counter.get() + 1);
    }) as Box<dyn FnMut(web_sys::Event)>);
    window
        .add_event_listener_with_callback("popstate", listener.as_ref().unchecked_ref())
        .expect("listener");

    let mut router = HistoryRouter::new(window.clone());
    router.navigate("/chatdb");

    assert_eq!(router.current_route(), "/chatdb");
    assert_eq!(fired.get(), 0, "popstate must not fire inside navigate");

    window
        .remove_event_listener_with_callback("popstate", listener.as_ref().unchecked_ref())
        .expect("remove listener");
}
