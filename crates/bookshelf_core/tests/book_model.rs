use bookshelf_core::{
    Book, BookForm, BookValidationError, UpdateOutcome, AUTHOR_MAX_LEN, ISBN_MAX_LEN,
};

fn valid_form() -> BookForm {
    BookForm {
        isbn: "978-0135957059".to_string(),
        title: "The Pragmatic Programmer".to_string(),
        author: "David Thomas".to_string(),
        year: "2019".to_string(),
        price: "40".to_string(),
    }
}

fn stored_book() -> Book {
    Book {
        isbn: "978-0135957059".to_string(),
        title: "The Pragmatic Programmer".to_string(),
        author: "David Thomas".to_string(),
        year_published: 2019,
        price: 40,
    }
}

#[test]
fn validate_new_accepts_complete_form() {
    let book = valid_form().validate_new(&[]).unwrap();

    assert_eq!(book.isbn, "978-0135957059");
    assert_eq!(book.title, "The Pragmatic Programmer");
    assert_eq!(book.author, "David Thomas");
    assert_eq!(book.year_published, 2019);
    assert_eq!(book.price, 40);
}

#[test]
fn every_empty_field_is_reported_by_name() {
    let cases: &[(&str, fn(&mut BookForm))] = &[
        ("isbn", |form| form.isbn.clear()),
        ("title", |form| form.title.clear()),
        ("author", |form| form.author.clear()),
        ("year_published", |form| form.year.clear()),
        ("price", |form| form.price.clear()),
    ];

    for &(field, clear) in cases {
        let mut form = valid_form();
        clear(&mut form);
        assert_eq!(
            form.validate_new(&[]),
            Err(BookValidationError::MissingField(field)),
            "clearing {field} should be rejected"
        );
    }
}

#[test]
fn year_and_price_must_parse_as_integers() {
    let mut form = valid_form();
    form.year = "19x9".to_string();
    assert!(matches!(
        form.validate_new(&[]),
        Err(BookValidationError::NotANumber {
            field: "year_published",
            ..
        })
    ));

    let mut form = valid_form();
    form.price = "forty".to_string();
    assert!(matches!(
        form.validate_new(&[]),
        Err(BookValidationError::NotANumber { field: "price", .. })
    ));
}

#[test]
fn year_boundaries_are_inclusive() {
    for rejected in ["1899", "2025"] {
        let mut form = valid_form();
        form.year = rejected.to_string();
        assert!(
            matches!(
                form.validate_new(&[]),
                Err(BookValidationError::OutOfRange {
                    field: "year_published",
                    ..
                })
            ),
            "year {rejected} should be rejected"
        );
    }

    for accepted in ["1900", "2024"] {
        let mut form = valid_form();
        form.year = accepted.to_string();
        let book = form.validate_new(&[]).unwrap();
        assert_eq!(book.year_published.to_string(), accepted);
    }
}

#[test]
fn price_must_be_strictly_positive() {
    for rejected in ["0", "-1"] {
        let mut form = valid_form();
        form.price = rejected.to_string();
        assert!(
            matches!(
                form.validate_new(&[]),
                Err(BookValidationError::InvalidPrice(_))
            ),
            "price {rejected} should be rejected"
        );
    }

    let mut form = valid_form();
    form.price = "1".to_string();
    assert_eq!(form.validate_new(&[]).unwrap().price, 1);
}

#[test]
fn duplicate_isbn_is_rejected_on_create() {
    let form = valid_form();
    let existing = vec!["other".to_string(), form.isbn.clone()];

    assert_eq!(
        form.validate_new(&existing),
        Err(BookValidationError::DuplicateKey(form.isbn.clone()))
    );

    // Unrelated isbns do not interfere.
    assert!(form.validate_new(&["other".to_string()]).is_ok());
}

#[test]
fn isbn_and_author_length_limits_are_enforced() {
    let mut form = valid_form();
    form.isbn = "x".repeat(ISBN_MAX_LEN + 1);
    assert!(matches!(
        form.validate_new(&[]),
        Err(BookValidationError::OutOfRange { field: "isbn", .. })
    ));

    let mut form = valid_form();
    form.author = "a".repeat(AUTHOR_MAX_LEN + 1);
    assert!(matches!(
        form.validate_new(&[]),
        Err(BookValidationError::OutOfRange {
            field: "author",
            ..
        })
    ));

    let mut form = valid_form();
    form.isbn = "x".repeat(ISBN_MAX_LEN);
    form.author = "a".repeat(AUTHOR_MAX_LEN);
    assert!(form.validate_new(&[]).is_ok());
}

#[test]
fn untouched_edit_form_yields_no_change() {
    let current = stored_book();
    let form = BookForm::from_book(&current);

    assert_eq!(
        form.validate_update(&current),
        Ok(UpdateOutcome::Unchanged)
    );
}

#[test]
fn no_change_check_runs_before_validation() {
    // An untouched form is a no-op even when its isbn field was blanked by
    // the caller; the isbn is read-only on update.
    let current = stored_book();
    let mut form = BookForm::from_book(&current);
    form.isbn.clear();

    assert_eq!(
        form.validate_update(&current),
        Ok(UpdateOutcome::Unchanged)
    );
}

#[test]
fn changed_edit_keeps_the_stored_isbn() {
    let current = stored_book();
    let mut form = BookForm::from_book(&current);
    form.isbn = "ignored".to_string();
    form.title = "The Pragmatic Programmer, 2nd ed.".to_string();

    match form.validate_update(&current).unwrap() {
        UpdateOutcome::Changed(book) => {
            assert_eq!(book.isbn, current.isbn);
            assert_eq!(book.title, "The Pragmatic Programmer, 2nd ed.");
        }
        UpdateOutcome::Unchanged => panic!("edit with a new title should be a change"),
    }
}

#[test]
fn edit_validation_still_enforces_ranges() {
    let current = stored_book();
    let mut form = BookForm::from_book(&current);
    form.year = "1899".to_string();
    assert!(matches!(
        form.validate_update(&current),
        Err(BookValidationError::OutOfRange {
            field: "year_published",
            ..
        })
    ));

    let mut form = BookForm::from_book(&current);
    form.title.clear();
    assert_eq!(
        form.validate_update(&current),
        Err(BookValidationError::MissingField("title"))
    );
}

#[test]
fn book_serde_round_trip() {
    let book = stored_book();
    let json = serde_json::to_string(&book).unwrap();
    let back: Book = serde_json::from_str(&json).unwrap();
    assert_eq!(back, book);
}

#[test]
fn from_book_renders_numbers_as_text() {
    let form = BookForm::from_book(&stored_book());
    assert_eq!(form.year, "2019");
    assert_eq!(form.price, "40");
}
