use leptos::*;
use leptos_router::*;

use cineweb_core::boundary::User;

use crate::Page;

#[component]
pub fn NavBar<F>(user: Signal<Option<User>>, on_logout: F) -> impl IntoView
where
    F: Fn() + 'static + Copy,
{
    view! {
      <nav>
        <strong>"CineWeb"</strong>
        <MenuItem page = Page::Reviews label = "Reviews" />
        <MenuItem page = Page::Movies label = "Movies" />
        <MenuItem page = Page::Rooms label = "Rooms" />
        <MenuItem page = Page::Screenings label = "Screenings" />
        <MenuItem page = Page::MovieSearch label = "Find a movie" />
        <span class="spacer"></span>
        { move || user.get().map(|user| view! {
            <span>
              { if user.picture.is_empty() {
                  None
                } else {
                  Some(view! { <img src=user.picture.clone() alt="" width="24" height="24" /> })
                }
              }
              " "{ if user.name.is_empty() { user.email.clone() } else { user.name.clone() } }
            </span>
          })
        }
        <a href="#" on:click = move |ev| { ev.prevent_default(); on_logout(); }>"Logout"</a>
      </nav>
    }
}

#[component]
fn MenuItem(page: Page, label: &'static str) -> impl IntoView {
    view! {
      <A href=page.path()>{ label }</A>
    }
}
