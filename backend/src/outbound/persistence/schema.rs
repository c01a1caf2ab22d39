//! Diesel table definitions for the cinema schema.
//!
//! These must match `backend/migrations` exactly. Constraints that Diesel
//! cannot express (the `showtimes_no_overlap` exclusion constraint and the
//! unique keys) are referenced by name in the error mapping.

diesel::table! {
    /// Movie catalog. `title` is unique (`movies_title_key`).
    movies (id) {
        /// Primary key assigned by a sequence.
        id -> Int8,
        title -> Text,
        genre -> Text,
        /// Running time in minutes, at least 1.
        duration_minutes -> Int4,
        /// Rating in `[0, 10]`.
        rating -> Float8,
        release_year -> Int4,
    }
}

diesel::table! {
    /// Scheduled screenings.
    ///
    /// `showtimes_no_overlap` rejects two rows in one theater whose closed
    /// `[start_time, end_time]` ranges intersect.
    showtimes (id) {
        id -> Int8,
        /// Movie identifier; not a foreign key.
        movie_id -> Int8,
        theater -> Text,
        start_time -> Timestamptz,
        end_time -> Timestamptz,
        price -> Float8,
    }
}

diesel::table! {
    /// Seat bookings. `(showtime_id, seat_number)` is unique
    /// (`bookings_seat_key`).
    bookings (id) {
        /// Primary key: UUID v4 generated by the ledger.
        id -> Uuid,
        showtime_id -> Int8,
        seat_number -> Int4,
        user_id -> Text,
    }
}
