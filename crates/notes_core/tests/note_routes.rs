mod common;

use notes_core::web::routes::login_redirect;
use notes_core::{form_data, reverse, Client, FormData, Response};

#[test]
fn public_pages_are_available_to_anonymous_user() {
    let app = common::app();
    let mut client = Client::new(&app);

    for name in ["home", "login", "logout", "signup"] {
        let url = reverse(name, None).unwrap();
        assert_eq!(client.get(&url).status(), 200, "{name}");
    }
}

#[test]
fn list_add_and_success_are_available_to_authenticated_user() {
    let app = common::app();
    let reader = common::user(&app, "Читатель");
    let mut client = Client::new(&app);
    client.force_login(&reader).unwrap();

    for name in ["list", "add", "success"] {
        let url = reverse(name, None).unwrap();
        assert_eq!(client.get(&url).status(), 200, "{name}");
    }
}

#[test]
fn note_pages_are_available_only_to_author() {
    let app = common::app();
    let author = common::user(&app, "Автор заметки");
    let reader = common::user(&app, "Читатель");
    let note = common::note(&app, &author, "Заголовок", "Текст заметки", "slug-1");

    let mut author_client = Client::new(&app);
    author_client.force_login(&author).unwrap();
    let mut reader_client = Client::new(&app);
    reader_client.force_login(&reader).unwrap();

    for name in ["detail", "edit", "delete"] {
        let url = reverse(name, Some(note.slug.as_str())).unwrap();
        assert_eq!(author_client.get(&url).status(), 200, "author {name}");
        assert_eq!(reader_client.get(&url), Response::NotFound, "reader {name}");
    }
}

#[test]
fn foreign_note_answers_like_missing_note() {
    let app = common::app();
    let author = common::user(&app, "Автор");
    let reader = common::user(&app, "Читатель");
    common::note(&app, &author, "Заголовок", "Текст", "slug-1");
    let mut reader_client = Client::new(&app);
    reader_client.force_login(&reader).unwrap();

    for name in ["detail", "edit", "delete"] {
        let foreign = reader_client.get(&reverse(name, Some("slug-1")).unwrap());
        let missing = reader_client.get(&reverse(name, Some("no-such-note")).unwrap());
        assert_eq!(foreign, missing, "{name}");
    }
}

#[test]
fn non_author_post_on_note_pages_is_not_found() {
    let app = common::app();
    let author = common::user(&app, "Автор");
    let reader = common::user(&app, "Читатель");
    let note = common::note(&app, &author, "Заголовок", "Текст", "slug-1");
    let mut reader_client = Client::new(&app);
    reader_client.force_login(&reader).unwrap();

    for name in ["detail", "edit", "delete"] {
        let url = reverse(name, Some(note.slug.as_str())).unwrap();
        assert_eq!(
            reader_client.post(&url, FormData::new()),
            Response::NotFound,
            "{name}"
        );
    }
    assert_eq!(common::note_by_slug(&app, "slug-1"), Some(note));
}

#[test]
fn anonymous_user_is_redirected_to_login_from_private_pages() {
    let app = common::app();
    let author = common::user(&app, "Автор");
    let note = common::note(&app, &author, "Заголовок", "Текст", "slug-1");
    let login_url = reverse("login", None).unwrap();
    let mut client = Client::new(&app);

    let urls = [
        reverse("detail", Some(note.slug.as_str())).unwrap(),
        reverse("edit", Some(note.slug.as_str())).unwrap(),
        reverse("delete", Some(note.slug.as_str())).unwrap(),
        reverse("list", None).unwrap(),
        reverse("add", None).unwrap(),
        reverse("success", None).unwrap(),
    ];
    for url in urls {
        let expected = format!("{login_url}?next={url}");
        let response = client.get(&url);
        assert_eq!(response.status(), 302, "{url}");
        assert_eq!(response.location(), Some(expected.as_str()), "{url}");
    }
}

#[test]
fn anonymous_redirect_precedes_note_lookup() {
    let app = common::app();
    let mut client = Client::new(&app);

    let response = client.get("/edit/does-not-exist/");
    assert_eq!(
        response.location(),
        Some(login_redirect("/edit/does-not-exist/").as_str())
    );
}

#[test]
fn anonymous_post_to_private_pages_redirects_to_login() {
    let app = common::app();
    let mut client = Client::new(&app);
    let form = form_data(&[("title", "t"), ("text", "t"), ("slug", "t")]);

    let response = client.post("/add/", form);
    assert_eq!(response.location(), Some("/auth/login/?next=/add/"));
}

#[test]
fn unknown_paths_and_methods_are_rejected() {
    let app = common::app();
    let author = common::user(&app, "Автор");
    common::note(&app, &author, "Заголовок", "Текст", "slug-1");
    let mut client = Client::new(&app);
    client.force_login(&author).unwrap();

    assert_eq!(client.get("/missing/"), Response::NotFound);
    assert_eq!(client.get("/note/bad slug/"), Response::NotFound);
    assert_eq!(
        client.post("/note/slug-1/", FormData::new()),
        Response::MethodNotAllowed
    );
    assert_eq!(
        client.post("/notes/", FormData::new()),
        Response::MethodNotAllowed
    );
}

#[test]
fn post_to_read_only_pages_is_not_allowed() {
    let app = common::app();
    let user = common::user(&app, "Читатель");
    let mut client = Client::new(&app);
    client.force_login(&user).unwrap();

    for name in ["home", "success"] {
        let url = reverse(name, None).unwrap();
        assert_eq!(
            client.post(&url, FormData::new()),
            Response::MethodNotAllowed,
            "{name}"
        );
    }
}

#[test]
fn anonymous_post_to_edit_and_delete_leaves_note_unchanged() {
    let app = common::app();
    let author = common::user(&app, "Автор");
    let note = common::note(&app, &author, "Заголовок", "Текст", "slug-1");
    let mut client = Client::new(&app);
    let form = form_data(&[("title", "Чужой"), ("text", "Чужой"), ("slug", "other")]);

    for name in ["edit", "delete"] {
        let url = reverse(name, Some(note.slug.as_str())).unwrap();
        let response = client.post(&url, form.clone());
        assert_eq!(response.location(), Some(login_redirect(&url).as_str()), "{name}");
    }
    assert_eq!(common::notes_count(&app), 1);
    assert_eq!(common::note_by_slug(&app, "slug-1"), Some(note));
}
