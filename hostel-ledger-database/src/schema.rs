diesel::table! {
    fees (fee_id) {
        fee_id -> Int4,
        student_id -> Int4,
        amount -> Float8,
        due_date -> Date,
        paid_date -> Nullable<Date>,
        #[max_length = 20]
        status -> Varchar,
        #[max_length = 20]
        payment_mode -> Nullable<Varchar>,
        #[max_length = 7]
        billing_cycle -> Varchar,
    }
}

diesel::table! {
    mess_skipping (skip_id) {
        skip_id -> Int4,
        student_id -> Int4,
        date -> Date,
        #[max_length = 10]
        meal_type -> Varchar,
        skipped -> Nullable<Bool>,
    }
}

diesel::table! {
    rooms (room_id) {
        room_id -> Int4,
        #[max_length = 20]
        room_no -> Varchar,
        #[max_length = 20]
        room_type -> Varchar,
        floor -> Int4,
        capacity -> Int4,
        current_occupants -> Int4,
        monthly_rent -> Float8,
        #[max_length = 20]
        status -> Varchar,
    }
}

diesel::table! {
    students (student_id) {
        student_id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        admission_date -> Date,
        admission_fee -> Bool,
        room_id -> Nullable<Int4>,
    }
}

diesel::joinable!(fees -> students (student_id));
diesel::joinable!(students -> rooms (room_id));

diesel::allow_tables_to_appear_in_same_query!(fees, mess_skipping, rooms, students);
