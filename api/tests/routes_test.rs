mod helpers;

mod routes {
    mod attendees_test;
    mod events_test;
    mod guests_test;
    mod letters_test;
    mod reports_test;
    mod settings_test;
}
