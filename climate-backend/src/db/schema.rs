// The layout of the published Hawaii climate database. Neither table is written to outside of
// dev mode and tests.

diesel::table! {
    measurement (id) {
        id -> Integer,
        station -> Text,
        date -> Date,
        prcp -> Nullable<Double>,
        tobs -> Nullable<Double>,
    }
}

diesel::table! {
    station (id) {
        id -> Integer,
        #[sql_name = "station"]
        code -> Text,
        name -> Text,
        latitude -> Nullable<Double>,
        longitude -> Nullable<Double>,
        elevation -> Nullable<Double>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(measurement, station);
