use diesel::prelude::*;

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favourites)]
pub struct NewFavourite {
    pub profile_id: i32,
    pub teacher_id: i32,
}
