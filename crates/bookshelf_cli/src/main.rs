//! Interactive terminal front-end for the bookshelf core.
//!
//! # Responsibility
//! - Own all stdin/stdout presentation: the setup dialog, the menu loop and
//!   the record forms.
//! - Delegate every validation and persistence decision to `bookshelf_core`.

use bookshelf_core::config::{self, ConfigError, FileConfigProvider};
use bookshelf_core::db::open_db;
use bookshelf_core::{
    default_log_level, establish_store, init_logging, Book, BookForm, BookRepository, BookService,
    ConnectionConfig, ConnectionFailure, EditOutcome, SetupPrompt, SqliteBookRepository,
};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

fn main() {
    init_file_logging();

    let provider = match FileConfigProvider::at_default_location() {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("cannot resolve config location: {err}");
            std::process::exit(1);
        }
    };

    let mut prompt = StdinPrompt;
    let conn = match establish_store(&mut prompt, &provider, connect) {
        Ok(Some(conn)) => conn,
        Ok(None) => {
            println!("Setup cancelled.");
            return;
        }
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    let repo = match SqliteBookRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("store is not usable: {err}");
            std::process::exit(1);
        }
    };
    let service = BookService::new(repo);

    println!("bookshelf {}", bookshelf_core::core_version());
    run_menu(&service);
}

fn init_file_logging() {
    // Logging is best effort; the catalogue still works without it.
    match config::default_log_dir() {
        Ok(dir) => {
            if let Err(err) = init_logging(default_log_level(), &dir) {
                eprintln!("logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("logging disabled: {err}"),
    }
}

/// Opens the embedded store described by the saved credentials.
///
/// `Host` doubles as an optional database-file path: empty or `localhost`
/// selects the default data-dir database. Username and password are kept in
/// the config for parity with server-backed stores.
fn connect(config: &ConnectionConfig) -> Result<Connection, ConnectionFailure> {
    let path = database_path(&config.host).map_err(ConnectionFailure::new)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(ConnectionFailure::new)?;
    }
    open_db(&path).map_err(ConnectionFailure::new)
}

fn database_path(host: &str) -> Result<PathBuf, ConfigError> {
    match host.trim() {
        "" | "localhost" => config::default_database_path(),
        other => Ok(PathBuf::from(other)),
    }
}

struct StdinPrompt;

impl SetupPrompt for StdinPrompt {
    fn request_credentials(
        &mut self,
        previous: Option<&ConnectionConfig>,
    ) -> Option<ConnectionConfig> {
        println!("Database connection setup (empty input keeps the shown value, Ctrl-D cancels).");
        let username = prompt_field("Username", previous.map(|c| c.username.as_str()))?;
        let password = prompt_field("Password", previous.map(|c| c.password.as_str()))?;
        let host = prompt_field("Host", previous.map(|c| c.host.as_str()))?;
        Some(ConnectionConfig {
            username,
            password,
            host,
        })
    }

    fn confirm_retry(&mut self, failure: &ConnectionFailure) -> bool {
        println!("{failure}");
        matches!(
            read_line("Try again? [y/N] "),
            Some(answer) if answer.trim().eq_ignore_ascii_case("y")
        )
    }
}

fn run_menu(service: &BookService<impl BookRepository>) {
    loop {
        let Some(line) = read_line("\n[l]ist  [a]dd  [e]dit  [d]elete  [q]uit > ") else {
            return;
        };
        match line.trim() {
            "l" | "list" => list_books(service),
            "a" | "add" => add_book(service),
            "e" | "edit" => edit_book(service),
            "d" | "delete" => delete_book(service),
            "q" | "quit" => return,
            "" => {}
            other => println!("unknown command `{other}`"),
        }
    }
}

fn list_books(service: &BookService<impl BookRepository>) {
    match service.list_books() {
        Ok(books) if books.is_empty() => {
            println!("No books found. Use `add` to create the first record.");
        }
        Ok(books) => {
            print_row("ISBN", "Title", "Author", "Year", "Price");
            for book in books {
                print_row(
                    &book.isbn,
                    &book.title,
                    &book.author,
                    &book.year_published.to_string(),
                    &book.price.to_string(),
                );
            }
        }
        Err(err) => println!("error: {err}"),
    }
}

fn print_row(isbn: &str, title: &str, author: &str, year: &str, price: &str) {
    println!("{isbn:<20}  {title:<32}  {author:<24}  {year:>4}  {price:>6}");
}

fn add_book(service: &BookService<impl BookRepository>) {
    let Some(form) = read_new_form() else { return };
    match service.add_book(&form) {
        Ok(book) => println!("Book `{}` added.", book.isbn),
        Err(err) => println!("error: {err}"),
    }
}

fn edit_book(service: &BookService<impl BookRepository>) {
    let Some(line) = read_line("ISBN to edit: ") else {
        return;
    };
    let isbn = line.trim();
    if isbn.is_empty() {
        return;
    }

    let current = match service.get_book(isbn) {
        Ok(book) => book,
        Err(err) => {
            println!("error: {err}");
            return;
        }
    };

    let Some(form) = read_edit_form(&current) else {
        return;
    };
    match service.edit_book(isbn, &form) {
        Ok(EditOutcome::Updated(_)) => println!("Book `{isbn}` updated."),
        Ok(EditOutcome::Unchanged) => println!("No changes made; book left as is."),
        Err(err) => println!("error: {err}"),
    }
}

fn delete_book(service: &BookService<impl BookRepository>) {
    let Some(line) = read_line("ISBN to delete: ") else {
        return;
    };
    let isbn = line.trim();
    if isbn.is_empty() {
        return;
    }

    let confirmed = matches!(
        read_line(&format!("Delete the book with ISBN `{isbn}`? [y/N] ")),
        Some(answer) if answer.trim().eq_ignore_ascii_case("y")
    );
    if !confirmed {
        return;
    }

    match service.remove_book(isbn) {
        Ok(()) => println!("Book `{isbn}` deleted."),
        Err(err) => println!("error: {err}"),
    }
}

fn read_new_form() -> Option<BookForm> {
    Some(BookForm {
        isbn: prompt_field("ISBN", None)?,
        title: prompt_field("Title", None)?,
        author: prompt_field("Author", None)?,
        year: prompt_field("Year published", None)?,
        price: prompt_field("Price", None)?,
    })
}

fn read_edit_form(current: &Book) -> Option<BookForm> {
    let prefill = BookForm::from_book(current);
    Some(BookForm {
        isbn: prefill.isbn.clone(),
        title: prompt_field("Title", Some(&prefill.title))?,
        author: prompt_field("Author", Some(&prefill.author))?,
        year: prompt_field("Year published", Some(&prefill.year))?,
        price: prompt_field("Price", Some(&prefill.price))?,
    })
}

/// Reads one field; empty input keeps the default shown in brackets.
/// Returns `None` on end of input.
fn prompt_field(label: &str, default: Option<&str>) -> Option<String> {
    let shown = default.unwrap_or("");
    let line = read_line(&format!("{label} [{shown}]: "))?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Some(shown.to_string())
    } else {
        Some(trimmed.to_string())
    }
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(_) => None,
    }
}
